//! Transport primitive: exactly one network call per invocation.

use std::collections::{HashMap, VecDeque};

use protocol::{Envelope, ServiceConfig};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use crate::descriptor::{Method, RequestDescriptor};
use crate::error::TransportError;
use crate::BoxFuture;

/// Object-safe request issuer.
///
/// All failures come back as [`TransportError`]; implementations never
/// panic past this boundary. Methods return boxed futures so callers can
/// hold a `dyn Transport` and substitute an in-memory one in tests.
pub trait Transport: Send + Sync {
    /// Issue the described request and decode the standard envelope.
    fn request(
        &self,
        descriptor: RequestDescriptor,
    ) -> BoxFuture<'_, Result<Envelope<Value>, TransportError>>;
}

/// HTTP transport over reqwest.
pub struct HttpTransport {
    client: reqwest::Client,
    config: ServiceConfig,
}

impl HttpTransport {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Reuse an existing client (connection pools are per-client).
    pub fn with_client(client: reqwest::Client, config: ServiceConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

impl Transport for HttpTransport {
    fn request(
        &self,
        descriptor: RequestDescriptor,
    ) -> BoxFuture<'_, Result<Envelope<Value>, TransportError>> {
        let url = self.config.url(&descriptor.endpoint);
        Box::pin(async move {
            let builder = match descriptor.method {
                Method::Get => self.client.get(&url),
                Method::Post => {
                    let builder = self.client.post(&url);
                    match &descriptor.body {
                        Some(body) => builder.json(body),
                        None => builder,
                    }
                }
            };

            let resp = builder
                .send()
                .await
                .map_err(|e| TransportError::Connect(e.to_string()))?;

            let status = resp.status();
            if !status.is_success() {
                return Err(TransportError::Status(status.as_u16()));
            }

            let envelope: Envelope<Value> = resp
                .json()
                .await
                .map_err(|e| TransportError::Decode(e.to_string()))?;

            debug!("phase one ok: {url} -> {}", envelope.request_id);
            Ok(envelope)
        })
    }
}

/// In-memory transport with scripted responses, for tests and offline use.
///
/// Responses are queued per endpoint and consumed in order; every issued
/// descriptor is recorded.
#[derive(Default)]
pub struct MemoryTransport {
    responses: Mutex<HashMap<String, VecDeque<Result<Envelope<Value>, TransportError>>>>,
    calls: Mutex<Vec<RequestDescriptor>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn script(&self, endpoint: &str, result: Result<Envelope<Value>, TransportError>) {
        self.responses
            .lock()
            .await
            .entry(endpoint.to_string())
            .or_default()
            .push_back(result);
    }

    /// Every descriptor issued so far, in order.
    pub async fn calls(&self) -> Vec<RequestDescriptor> {
        self.calls.lock().await.clone()
    }
}

impl Transport for MemoryTransport {
    fn request(
        &self,
        descriptor: RequestDescriptor,
    ) -> BoxFuture<'_, Result<Envelope<Value>, TransportError>> {
        Box::pin(async move {
            self.calls.lock().await.push(descriptor.clone());
            self.responses
                .lock()
                .await
                .get_mut(&descriptor.endpoint)
                .and_then(|queue| queue.pop_front())
                .unwrap_or_else(|| {
                    Err(TransportError::Connect(format!(
                        "no scripted response for {}",
                        descriptor.endpoint
                    )))
                })
        })
    }
}
