//! Catalog configuration flow: pick a card, fill in the details, choose a
//! save option, save.

use std::fmt;
use std::sync::Arc;

use fetch::{RequestDescriptor, Transport, TransportError};
use protocol::{CardMetadata, Endpoints, RequestId, SaveCatalogRequest, SaveMethod};
use tracing::info;

/// Stage of the catalog configuration flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CatalogStage {
    #[default]
    Browsing,
    Details,
    SaveOptions,
}

/// Terminal result of the last save attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    NotSaved,
    Saved,
    Failed(TransportError),
}

/// The chosen card, kept by id and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedCatalog {
    pub id: String,
    pub name: String,
}

/// Why a flow operation was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogFlowError {
    /// No card has been selected yet.
    NothingSelected,
    /// No save method chosen.
    NoSaveMethod,
    /// The save call itself failed.
    Transport(TransportError),
}

impl fmt::Display for CatalogFlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogFlowError::NothingSelected => write!(f, "no catalog selected"),
            CatalogFlowError::NoSaveMethod => write!(f, "no save method chosen"),
            CatalogFlowError::Transport(e) => write!(f, "save failed: {e}"),
        }
    }
}

impl std::error::Error for CatalogFlowError {}

/// State shared by the catalog configuration widgets.
///
/// Browsing → Details (card selected, draft pre-filled) → SaveOptions →
/// saved/failed, with reset back to Browsing.
#[derive(Debug, Default)]
pub struct CatalogFlow {
    stage: CatalogStage,
    selected: Option<SelectedCatalog>,
    name: String,
    description: String,
    legend_list: String,
    subscription_price: String,
    save_method: Option<SaveMethod>,
    outcome: Option<SaveOutcome>,
}

impl CatalogFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> CatalogStage {
        self.stage
    }

    pub fn selected(&self) -> Option<&SelectedCatalog> {
        self.selected.as_ref()
    }

    pub fn outcome(&self) -> SaveOutcome {
        self.outcome.clone().unwrap_or(SaveOutcome::NotSaved)
    }

    /// Select a card: pre-fills the draft from its metadata and moves the
    /// flow to the details stage.
    pub fn select(&mut self, card: &CardMetadata) {
        info!("catalog selected: {} ({})", card.name, card.id);
        self.selected = Some(SelectedCatalog {
            id: card.id.clone(),
            name: card.name.clone(),
        });
        self.name = card.name.clone();
        self.description = card.description.clone();
        self.legend_list = format!("Legend list for {}", card.name);
        self.subscription_price = if card.can_access {
            String::new()
        } else {
            "99.99".to_string()
        };
        self.outcome = None;
        self.stage = CatalogStage::Details;
    }

    pub fn legend_list(&self) -> &str {
        &self.legend_list
    }

    pub fn subscription_price(&self) -> &str {
        &self.subscription_price
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Move from details to the save-options stage.
    pub fn to_save_options(&mut self) -> Result<(), CatalogFlowError> {
        if self.selected.is_none() {
            return Err(CatalogFlowError::NothingSelected);
        }
        self.stage = CatalogStage::SaveOptions;
        Ok(())
    }

    pub fn choose_save_method(&mut self, method: SaveMethod) {
        self.save_method = Some(method);
    }

    /// Perform the save POST and record the outcome.
    pub async fn save(
        &mut self,
        transport: &Arc<dyn Transport>,
        endpoints: &Endpoints,
    ) -> Result<RequestId, CatalogFlowError> {
        let selected = self
            .selected
            .clone()
            .ok_or(CatalogFlowError::NothingSelected)?;
        let save_method = self.save_method.ok_or(CatalogFlowError::NoSaveMethod)?;

        let body = SaveCatalogRequest {
            catalog_id: selected.id,
            name: self.name.clone(),
            description: self.description.clone(),
            save_method,
        };
        let body = serde_json::to_value(&body)
            .map_err(|e| CatalogFlowError::Transport(TransportError::Decode(e.to_string())))?;

        match transport
            .request(RequestDescriptor::post(&endpoints.save_catalog, body))
            .await
        {
            Ok(envelope) => {
                info!("catalog saved: {}", envelope.request_id);
                self.outcome = Some(SaveOutcome::Saved);
                Ok(envelope.request_id)
            }
            Err(e) => {
                self.outcome = Some(SaveOutcome::Failed(e.clone()));
                Err(CatalogFlowError::Transport(e))
            }
        }
    }

    /// Back to browsing with a clean draft.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
