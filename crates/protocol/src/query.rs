use serde::{Deserialize, Serialize};

/// Phase-one body for a nearby-places fetch around a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceQuery {
    pub lat: f64,
    pub lng: f64,
    /// Search radius in meters.
    pub radius: u32,
    /// Place category, e.g. `"gas_station"`.
    #[serde(rename = "type")]
    pub category: String,
}

/// Phase-one body for loading a whole catalog dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetQuery {
    #[serde(rename = "catalogue_dataset_id")]
    pub dataset_id: String,
}

impl DatasetQuery {
    pub fn new(dataset_id: impl Into<String>) -> Self {
        Self {
            dataset_id: dataset_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn place_query_uses_backend_field_names() {
        let q = PlaceQuery {
            lat: 22.4925,
            lng: 39.17757,
            radius: 5000,
            category: "gas_station".to_string(),
        };
        let json = serde_json::to_value(&q).expect("encode");
        assert_eq!(json["type"], "gas_station");
        assert_eq!(json["radius"], 5000);
    }

    #[test]
    fn dataset_query_uses_backend_field_names() {
        let json = serde_json::to_value(DatasetQuery::new("abc")).expect("encode");
        assert_eq!(json["catalogue_dataset_id"], "abc");
    }
}
