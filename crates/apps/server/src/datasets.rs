//! Seeded sample data served by the dev backend.

use std::collections::HashMap;

use protocol::{
    CardMetadata, CityInfo, CountryCities, Feature, FeatureCollection, PlaceProperties,
    PlaceQuery,
};
use serde_json::{json, Value};

pub struct SampleData {
    cards: Vec<CardMetadata>,
    layer_cards: Vec<CardMetadata>,
    datasets: HashMap<String, FeatureCollection>,
    cities: CountryCities,
}

impl SampleData {
    pub fn new() -> Self {
        let cards = sample_cards();
        let mut datasets = HashMap::new();
        for card in cards.iter().filter(|c| c.can_access) {
            datasets.insert(
                card.id.clone(),
                points_around(22.4925, 39.17757, (card.records_number).min(64) as usize),
            );
        }
        Self {
            layer_cards: cards.iter().take(2).cloned().collect(),
            cards,
            datasets,
            cities: sample_cities(),
        }
    }

    pub fn catalog_cards(&self) -> Value {
        json!(self.cards)
    }

    pub fn layer_cards(&self) -> Value {
        json!(self.layer_cards)
    }

    pub fn country_cities(&self) -> Value {
        json!(self.cities)
    }

    pub fn place_categories(&self) -> Value {
        json!({
            "Automotive": ["car_rental", "car_repair", "gas_station", "parking"],
            "Food and Drink": ["bakery", "cafe", "coffee_shop", "restaurant"],
            "Shopping": ["convenience_store", "grocery_store", "supermarket"],
            "Transportation": ["airport", "bus_station", "train_station"],
        })
    }

    pub fn dataset_points(&self, dataset_id: &str) -> Option<FeatureCollection> {
        self.datasets.get(dataset_id).cloned()
    }

    /// Deterministic ring of points around the query center.
    pub fn nearby_points(&self, query: &PlaceQuery) -> FeatureCollection {
        let count = 12usize;
        // Radius in degrees, ~111 km per degree.
        let radius_deg = query.radius as f64 / 111_000.0;
        let features = (0..count)
            .map(|i| {
                let angle = (i as f64 / count as f64) * std::f64::consts::TAU;
                let lng = query.lng + radius_deg * angle.cos();
                let lat = query.lat + radius_deg * angle.sin();
                Feature::point(
                    lng,
                    lat,
                    PlaceProperties {
                        name: format!("{} {}", query.category, i + 1),
                        rating: 3.0 + (i % 5) as f64 * 0.4,
                        business_status: "OPERATIONAL".to_string(),
                        user_ratings_total: (i as u64 + 1) * 10,
                        ..PlaceProperties::default()
                    },
                )
            })
            .collect();
        FeatureCollection::new(features)
    }
}

impl Default for SampleData {
    fn default() -> Self {
        Self::new()
    }
}

fn sample_cards() -> Vec<CardMetadata> {
    vec![
        CardMetadata {
            id: "5218f0ef-c4db-4441-81e2-83ce413a9645".to_string(),
            name: "Gas stations poi data".to_string(),
            description: "Database of all gas station points of interest".to_string(),
            thumbnail_url: "https://assets.example.com/gas_stations.png".to_string(),
            catalog_link: "https://assets.example.com/gas_stations.png".to_string(),
            records_number: 8517,
            can_access: true,
        },
        CardMetadata {
            id: "3e5ee589-25e6-4cae-8aec-3ed3cdecef94".to_string(),
            name: "Restaurants, cafes and bakeries".to_string(),
            description: "Restaurants, cafes and bakeries".to_string(),
            thumbnail_url: "https://assets.example.com/restaurants.png".to_string(),
            catalog_link: "https://assets.example.com/restaurants.png".to_string(),
            records_number: 132_383,
            can_access: true,
        },
        CardMetadata {
            id: "c4eb5d56-4fcf-4095-8037-4c84894fd014".to_string(),
            name: "Real estate transactions".to_string(),
            description: "Database of real-estate transactions".to_string(),
            thumbnail_url: "https://assets.example.com/real_estate.png".to_string(),
            catalog_link: "https://assets.example.com/real_estate.png".to_string(),
            records_number: 179_141,
            can_access: false,
        },
    ]
}

fn sample_cities() -> CountryCities {
    let mut cities = CountryCities::new();
    cities.insert(
        "Saudi Arabia".to_string(),
        vec![
            CityInfo {
                name: "Jeddah".to_string(),
                lat: 21.5433,
                lng: 39.1728,
                radius: 5000,
                category: None,
            },
            CityInfo {
                name: "Riyadh".to_string(),
                lat: 24.7136,
                lng: 46.6753,
                radius: 5000,
                category: None,
            },
        ],
    );
    cities.insert(
        "United Arab Emirates".to_string(),
        vec![CityInfo {
            name: "Dubai".to_string(),
            lat: 25.2048,
            lng: 55.2708,
            radius: 5000,
            category: None,
        }],
    );
    cities
}

fn points_around(lat: f64, lng: f64, count: usize) -> FeatureCollection {
    let features = (0..count.max(1))
        .map(|i| {
            let step = i as f64 * 0.003;
            Feature::point(
                lng + step,
                lat + step * 0.5,
                PlaceProperties {
                    name: format!("record {}", i + 1),
                    business_status: "OPERATIONAL".to_string(),
                    ..PlaceProperties::default()
                },
            )
        })
        .collect();
    FeatureCollection::new(features)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessible_cards_have_datasets() {
        let samples = SampleData::new();
        for card in sample_cards() {
            let points = samples.dataset_points(&card.id);
            assert_eq!(points.is_some(), card.can_access, "{}", card.name);
        }
    }

    #[test]
    fn nearby_points_stay_near_the_center() {
        let samples = SampleData::new();
        let query = PlaceQuery {
            lat: 21.5433,
            lng: 39.1728,
            radius: 1000,
            category: "cafe".to_string(),
        };
        let points = samples.nearby_points(&query);
        assert_eq!(points.len(), 12);
        for feature in &points.features {
            let [lng, lat] = feature.geometry.coordinates;
            assert!((lng - query.lng).abs() < 0.02);
            assert!((lat - query.lat).abs() < 0.02);
        }
    }

    #[test]
    fn unknown_dataset_has_no_points() {
        let samples = SampleData::new();
        assert!(samples.dataset_points("nope").is_none());
    }
}
