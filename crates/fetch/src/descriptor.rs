use serde_json::Value;

/// HTTP method for a phase-one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Method {
    #[default]
    Get,
    Post,
}

/// Immutable description of one phase-one request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// Endpoint path, joined onto the configured HTTP base.
    pub endpoint: String,
    pub method: Method,
    /// JSON body; also echoed over the phase-two stream right after open.
    pub body: Option<Value>,
}

impl RequestDescriptor {
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: Method::Get,
            body: None,
        }
    }

    pub fn post(endpoint: impl Into<String>, body: Value) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: Method::Post,
            body: Some(body),
        }
    }

    /// The query JSON the protocol requires the client to repeat on the
    /// stream. `null` for body-less requests.
    pub fn query_json(&self) -> Value {
        self.body.clone().unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_has_no_body() {
        let d = RequestDescriptor::get("/catalog-collection");
        assert_eq!(d.method, Method::Get);
        assert_eq!(d.query_json(), Value::Null);
    }

    #[test]
    fn post_keeps_body_for_stream_echo() {
        let d = RequestDescriptor::post("/fetch-dataset", json!({"catalogue_dataset_id": "abc"}));
        assert_eq!(d.method, Method::Post);
        assert_eq!(d.query_json()["catalogue_dataset_id"], "abc");
    }
}
