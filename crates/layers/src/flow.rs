//! Staged layer-creation flow: details → styling → save.

use std::fmt;
use std::sync::Arc;

use fetch::{
    FetchState, LoadHandle, Loader, RequestDescriptor, Transport, TransportError,
};
use protocol::{
    CountryCities, Endpoints, FeatureCollection, RequestId, SaveLayerRequest, SaveMethod,
};
use tracing::info;

use crate::draft::{DraftError, LayerDraft};
use crate::style::LayerStyle;

/// Stage of the layer-creation flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LayerStage {
    #[default]
    Details,
    Styling,
    Save,
}

impl LayerStage {
    fn next(self) -> Self {
        match self {
            LayerStage::Details => LayerStage::Styling,
            LayerStage::Styling | LayerStage::Save => LayerStage::Save,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerFlowError {
    /// The draft or the style is incomplete.
    Draft(DraftError),
    /// No fetched data to save yet.
    NoData,
    /// No save method chosen.
    NoSaveMethod,
    /// The save call itself failed.
    Transport(TransportError),
}

impl fmt::Display for LayerFlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerFlowError::Draft(e) => write!(f, "{e}"),
            LayerFlowError::NoData => write!(f, "no fetched data to save"),
            LayerFlowError::NoSaveMethod => write!(f, "no save method chosen"),
            LayerFlowError::Transport(e) => write!(f, "save failed: {e}"),
        }
    }
}

impl std::error::Error for LayerFlowError {}

impl From<DraftError> for LayerFlowError {
    fn from(e: DraftError) -> Self {
        LayerFlowError::Draft(e)
    }
}

/// State shared by the layer-creation widgets.
#[derive(Debug, Default)]
pub struct LayerFlow {
    stage: LayerStage,
    draft: LayerDraft,
    style: LayerStyle,
    save_method: Option<SaveMethod>,
    fetched: Option<FeatureCollection>,
    saved: bool,
    failed: bool,
}

impl LayerFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> LayerStage {
        self.stage
    }

    pub fn draft(&self) -> &LayerDraft {
        &self.draft
    }

    pub fn style(&self) -> &LayerStyle {
        &self.style
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    pub fn set_draft(&mut self, draft: LayerDraft) {
        self.draft = draft;
    }

    pub fn set_style(&mut self, style: LayerStyle) {
        self.style = style;
    }

    pub fn choose_save_method(&mut self, method: SaveMethod) {
        self.save_method = Some(method);
    }

    /// Validate the draft, resolve it against the reference data, and
    /// start the two-phase fetch. Advances to the styling stage.
    pub fn start_fetch(
        &mut self,
        loader: &Loader<FeatureCollection>,
        cities: &CountryCities,
        endpoints: &Endpoints,
    ) -> Result<LoadHandle<FeatureCollection>, LayerFlowError> {
        let query = self.draft.to_query(cities)?;
        let body = serde_json::to_value(&query)
            .map_err(|e| LayerFlowError::Transport(TransportError::Decode(e.to_string())))?;

        info!(
            "layer fetch: {} in {} ({})",
            query.category, self.draft.city, self.draft.country
        );
        let handle = loader.load(RequestDescriptor::post(&endpoints.nearby_places, body));
        self.stage = self.stage.next();
        Ok(handle)
    }

    /// Record the fetch result once the load reached a terminal state.
    /// Returns whether the data is usable for the save stage.
    pub fn absorb_fetch(&mut self, state: &FetchState<FeatureCollection>) -> bool {
        match state {
            FetchState::Ready(outcome) => {
                self.fetched = Some(outcome.data.clone());
                true
            }
            _ => false,
        }
    }

    /// The styling stage requires every style field; mirrors the draft
    /// validation so the failure is a validation error, not a save error.
    pub fn finish_styling(&mut self) -> Result<(), LayerFlowError> {
        let mut missing = Vec::new();
        if self.style.name.trim().is_empty() {
            missing.push("name");
        }
        if self.style.point_color.trim().is_empty() {
            missing.push("point_color");
        }
        if self.style.legend.trim().is_empty() {
            missing.push("legend");
        }
        if self.style.description.trim().is_empty() {
            missing.push("description");
        }
        if !missing.is_empty() {
            return Err(DraftError::MissingFields(missing).into());
        }
        self.stage = self.stage.next();
        Ok(())
    }

    /// Perform the save POST with the styled layer and fetched points.
    pub async fn save(
        &mut self,
        transport: &Arc<dyn Transport>,
        endpoints: &Endpoints,
    ) -> Result<RequestId, LayerFlowError> {
        let data = self.fetched.clone().ok_or(LayerFlowError::NoData)?;
        let save_method = self.save_method.ok_or(LayerFlowError::NoSaveMethod)?;

        let body = SaveLayerRequest {
            name: self.style.name.clone(),
            description: self.style.description.clone(),
            legend: self.style.legend.clone(),
            point_color: self.style.point_color.clone(),
            save_method,
            data,
        };
        let body = serde_json::to_value(&body)
            .map_err(|e| LayerFlowError::Transport(TransportError::Decode(e.to_string())))?;

        match transport
            .request(RequestDescriptor::post(&endpoints.save_layer, body))
            .await
        {
            Ok(envelope) => {
                info!("layer saved: {}", envelope.request_id);
                self.saved = true;
                self.failed = false;
                Ok(envelope.request_id)
            }
            Err(e) => {
                self.failed = true;
                Err(LayerFlowError::Transport(e))
            }
        }
    }

    /// Back to the details stage with a clean slate.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
