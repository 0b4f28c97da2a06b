//! Save-call bodies for configured layers and catalogs.

use serde::{Deserialize, Serialize};

use crate::FeatureCollection;

/// Where the saved data should live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveMethod {
    /// Sample rows stored on the hosted service.
    HostedSample,
    /// Full dataset stored on the hosted service (storage account is
    /// created for the user, who keeps ownership).
    HostedFull,
    /// Sample rows stored on the user's own database.
    OwnDbSample,
    /// Full dataset stored on the user's own database.
    OwnDbFull,
}

/// `POST <save-layer>` body: the styled layer plus the fetched points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveLayerRequest {
    pub name: String,
    pub description: String,
    pub legend: String,
    pub point_color: String,
    pub save_method: SaveMethod,
    pub data: FeatureCollection,
}

/// `POST <save-catalog>` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveCatalogRequest {
    pub catalog_id: String,
    pub name: String,
    pub description: String,
    pub save_method: SaveMethod,
}
