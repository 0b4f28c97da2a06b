//! Explicit service configuration.
//!
//! Endpoint paths and both base URLs travel as one value passed into
//! constructors; nothing reads process-global state at call time.

use std::env;

use serde::{Deserialize, Serialize};

use crate::RequestId;

/// Endpoint paths relative to the HTTP base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub dataset_load: String,
    pub nearby_places: String,
    pub catalog_collection: String,
    pub layer_collection: String,
    pub country_city: String,
    pub place_categories: String,
    pub save_layer: String,
    pub save_catalog: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            dataset_load: "/fetch-dataset".to_string(),
            nearby_places: "/fetch-nearby".to_string(),
            catalog_collection: "/catalog-collection".to_string(),
            layer_collection: "/layer-collection".to_string(),
            country_city: "/country-city".to_string(),
            place_categories: "/place-categories".to_string(),
            save_layer: "/save-layer".to_string(),
            save_catalog: "/save-catalog".to_string(),
        }
    }
}

/// Where the backend lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// e.g. `http://127.0.0.1:9200`
    pub http_base: String,
    /// Phase-two base; the correlation id is appended verbatim,
    /// e.g. `ws://127.0.0.1:9200/ws/`.
    pub ws_base: String,
    #[serde(default)]
    pub endpoints: Endpoints,
}

impl ServiceConfig {
    pub fn new(http_base: impl Into<String>, ws_base: impl Into<String>) -> Self {
        Self {
            http_base: http_base.into(),
            ws_base: ws_base.into(),
            endpoints: Endpoints::default(),
        }
    }

    /// Read `CATALOG_API_URL` / `CATALOG_WS_URL`, with localhost defaults.
    pub fn from_env() -> Self {
        let http_base =
            env::var("CATALOG_API_URL").unwrap_or_else(|_| "http://127.0.0.1:9200".to_string());
        let ws_base =
            env::var("CATALOG_WS_URL").unwrap_or_else(|_| "ws://127.0.0.1:9200/ws/".to_string());
        Self::new(http_base, ws_base)
    }

    /// Absolute URL for an endpoint path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.http_base.trim_end_matches('/'), path)
    }

    /// Phase-two URL for a correlation id.
    pub fn ws_url(&self, request_id: &RequestId) -> String {
        format!("{}{}", self.ws_base, request_id)
    }
}
