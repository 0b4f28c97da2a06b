use serde::{Deserialize, Serialize};

/// A message on the phase-two stream.
///
/// The backend sends exactly one of `{"data": ...}` or `{"error": ...}`
/// per request; untagged deserialization tries data first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StreamPayload {
    Data { data: serde_json::Value },
    Error { error: String },
}

impl StreamPayload {
    pub fn data(value: serde_json::Value) -> Self {
        Self::Data { data: value }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn data_message_decodes() {
        let payload: StreamPayload =
            serde_json::from_str(r#"{"data": {"type": "FeatureCollection", "features": []}}"#)
                .expect("decode");
        match payload {
            StreamPayload::Data { data } => assert_eq!(data["type"], "FeatureCollection"),
            StreamPayload::Error { .. } => panic!("expected data"),
        }
    }

    #[test]
    fn error_message_decodes() {
        let payload: StreamPayload =
            serde_json::from_str(r#"{"error": "dataset not found"}"#).expect("decode");
        assert_eq!(payload, StreamPayload::error("dataset not found"));
    }

    #[test]
    fn data_wins_when_both_shapes_could_apply() {
        // A data payload whose value happens to contain an error key still
        // decodes as data because the top-level data field is present.
        let payload: StreamPayload =
            serde_json::from_value(json!({"data": {"error": "nested"}})).expect("decode");
        assert!(matches!(payload, StreamPayload::Data { .. }));
    }
}
