//! Typed metadata calls against the backend collections.

use std::sync::Arc;

use fetch::{RequestDescriptor, Transport, TransportError};
use protocol::{CardMetadata, CategoryGroups, CountryCities, Endpoints, Envelope};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Plain-GET client for the picker data: catalog cards, layer cards,
/// country/city reference data, and place categories.
pub struct CollectionClient {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
}

impl CollectionClient {
    pub fn new(transport: Arc<dyn Transport>, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    pub async fn catalog_cards(&self) -> Result<Envelope<Vec<CardMetadata>>, TransportError> {
        self.get_typed(&self.endpoints.catalog_collection).await
    }

    pub async fn layer_cards(&self) -> Result<Envelope<Vec<CardMetadata>>, TransportError> {
        self.get_typed(&self.endpoints.layer_collection).await
    }

    pub async fn country_cities(&self) -> Result<Envelope<CountryCities>, TransportError> {
        self.get_typed(&self.endpoints.country_city).await
    }

    pub async fn place_categories(&self) -> Result<Envelope<CategoryGroups>, TransportError> {
        self.get_typed(&self.endpoints.place_categories).await
    }

    async fn get_typed<T: DeserializeOwned>(
        &self,
        endpoint: &str,
    ) -> Result<Envelope<T>, TransportError> {
        let envelope = self
            .transport
            .request(RequestDescriptor::get(endpoint))
            .await?;
        debug!("collection fetched: {endpoint}");
        let Envelope {
            message,
            request_id,
            data,
        } = envelope;
        let data = serde_json::from_value(data)
            .map_err(|e| TransportError::Decode(e.to_string()))?;
        Ok(Envelope {
            message,
            request_id,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fetch::MemoryTransport;
    use pretty_assertions::assert_eq;
    use protocol::RequestId;
    use serde_json::json;

    fn envelope(data: serde_json::Value) -> Envelope<serde_json::Value> {
        Envelope {
            message: "Request received".to_string(),
            request_id: RequestId::new("req-1"),
            data,
        }
    }

    fn client(transport: Arc<MemoryTransport>) -> CollectionClient {
        CollectionClient::new(transport as Arc<dyn Transport>, Endpoints::default())
    }

    #[tokio::test]
    async fn catalog_cards_decode_from_envelope() {
        let transport = Arc::new(MemoryTransport::new());
        transport
            .script(
                "/catalog-collection",
                Ok(envelope(json!([{
                    "id": "1",
                    "name": "Gas stations poi data",
                    "description": "Points of interest",
                    "thumbnail_url": "https://assets.example.com/gas.png",
                    "catalog_link": "https://assets.example.com/gas.png",
                    "records_number": 10,
                    "can_access": true
                }]))),
            )
            .await;

        let cards = client(Arc::clone(&transport))
            .catalog_cards()
            .await
            .expect("cards");
        assert_eq!(cards.data.len(), 1);
        assert_eq!(cards.data[0].id, "1");
        assert!(cards.data[0].can_access);
    }

    #[tokio::test]
    async fn wrong_payload_shape_is_a_decode_error() {
        let transport = Arc::new(MemoryTransport::new());
        transport
            .script("/layer-collection", Ok(envelope(json!("not-cards"))))
            .await;

        let err = client(Arc::clone(&transport))
            .layer_cards()
            .await
            .expect_err("must fail");
        assert!(matches!(err, TransportError::Decode(_)));
    }

    #[tokio::test]
    async fn country_cities_keep_picker_order() {
        let transport = Arc::new(MemoryTransport::new());
        transport
            .script(
                "/country-city",
                Ok(envelope(json!({
                    "country2": [{"name": "cityA", "lat": 1.0, "lng": 2.0, "radius": 1000}],
                    "country1": [{"name": "city1", "lat": 3.0, "lng": 4.0, "radius": 1000}]
                }))),
            )
            .await;

        let cities = client(Arc::clone(&transport))
            .country_cities()
            .await
            .expect("cities");
        let countries: Vec<&String> = cities.data.keys().collect();
        assert_eq!(countries, ["country1", "country2"]);
    }
}
