use std::fmt;

use serde::{Deserialize, Serialize};

/// Correlation id binding a phase-one request to its phase-two stream.
///
/// Opaque to the client; minted by the backend (`req-<uuid>` on the dev
/// server). Unique per in-flight request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Standard response body for every backend endpoint:
/// `{ "message": ..., "request_id": ..., "data": ... }`.
///
/// For phase-one calls `data` is an acknowledgment only; the payload
/// arrives on the stream keyed by `request_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub message: String,
    pub request_id: RequestId,
    pub data: T,
}

impl<T> Envelope<T> {
    /// Re-wrap the payload, keeping message and correlation id.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            message: self.message,
            request_id: self.request_id,
            data: f(self.data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn envelope_round_trips_wire_names() {
        let json = r#"{"message":"Request received","request_id":"req-1","data":""}"#;
        let env: Envelope<String> = serde_json::from_str(json).expect("decode");
        assert_eq!(env.message, "Request received");
        assert_eq!(env.request_id.as_str(), "req-1");

        let back = serde_json::to_string(&env).expect("encode");
        assert_eq!(back, json);
    }

    #[test]
    fn request_id_is_transparent() {
        let id: RequestId = serde_json::from_str("\"req-abc\"").expect("decode");
        assert_eq!(id, RequestId::new("req-abc"));
    }
}
