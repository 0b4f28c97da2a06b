//! GeoJSON-shaped map data delivered by dataset and nearby-place fetches.

use serde::{Deserialize, Serialize};

/// Literal `"FeatureCollection"` marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionKind {
    #[default]
    FeatureCollection,
}

/// Literal `"Feature"` marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureKind {
    #[default]
    Feature,
}

/// Literal `"Point"` marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointKind {
    #[default]
    Point,
}

/// Properties attached to each place point.
///
/// The backend may omit fields for sparse records; defaults keep `{}`
/// decodable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceProperties {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub business_status: String,
    #[serde(default)]
    pub user_ratings_total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub kind: PointKind,
    /// `[lng, lat]`, GeoJSON axis order.
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    #[serde(default)]
    pub properties: PlaceProperties,
    pub geometry: PointGeometry,
}

impl Feature {
    pub fn point(lng: f64, lat: f64, properties: PlaceProperties) -> Self {
        Self {
            kind: FeatureKind::Feature,
            properties,
            geometry: PointGeometry {
                kind: PointKind::Point,
                coordinates: [lng, lat],
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: CollectionKind,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: CollectionKind::FeatureCollection,
            features,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// `[lng, lat]` of the first feature; callers center the map on it.
    pub fn center(&self) -> Option<[f64; 2]> {
        self.features.first().map(|f| f.geometry.coordinates)
    }
}
