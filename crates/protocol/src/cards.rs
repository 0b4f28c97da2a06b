use serde::{Deserialize, Serialize};

/// Metadata for one catalog or layer offering shown in a picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardMetadata {
    pub id: String,
    pub name: String,
    pub description: String,
    pub thumbnail_url: String,
    pub catalog_link: String,
    pub records_number: u64,
    /// Whether the current account may load the underlying dataset.
    pub can_access: bool,
}
