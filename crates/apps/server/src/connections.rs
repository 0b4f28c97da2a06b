//! Pending-request registry and the phase-two WebSocket handler.
//!
//! Phase-one POSTs register the validated query under a fresh correlation
//! id; the client then opens `/ws/{request_id}`, repeats the query as its
//! first text frame, and receives `{"data": ...}` or `{"error": ...}`.
//! A registration is consumed by the stream that claims it.

use std::collections::HashMap;

use axum::extract::ws::{Message, WebSocket};
use parking_lot::RwLock;
use protocol::{DatasetQuery, PlaceQuery, RequestId};
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::AppState;

/// A validated phase-one query awaiting its stream.
#[derive(Debug, Clone)]
pub enum PendingQuery {
    Dataset(DatasetQuery),
    Nearby(PlaceQuery),
}

pub struct PendingRequests {
    inner: RwLock<HashMap<RequestId, PendingQuery>>,
}

impl PendingRequests {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    pub fn register(&self, request_id: RequestId, query: PendingQuery) {
        debug!("pending request: {request_id}");
        self.inner.write().insert(request_id, query);
    }

    /// Consume the registration; a correlation id serves one stream only.
    pub fn take(&self, request_id: &RequestId) -> Option<PendingQuery> {
        self.inner.write().remove(request_id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }
}

impl Default for PendingRequests {
    fn default() -> Self {
        Self::new()
    }
}

pub fn mint_request_id() -> RequestId {
    RequestId::new(format!("req-{}", Uuid::new_v4()))
}

pub async fn serve_stream(mut socket: WebSocket, request_id: RequestId, state: AppState) {
    info!("stream open: {request_id}");

    // Protocol: the client repeats its query as the first text frame.
    let echoed = loop {
        match socket.recv().await {
            Some(Ok(Message::Text(text))) => break text,
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
            Some(Ok(Message::Close(_))) | None => {
                info!("stream closed before query: {request_id}");
                return;
            }
            Some(Ok(Message::Binary(_))) => {
                send_error(&mut socket, "unexpected binary frame").await;
                return;
            }
            Some(Err(e)) => {
                warn!("stream receive error: {request_id} -> {e}");
                return;
            }
        }
    };

    if serde_json::from_str::<Value>(&echoed).is_err() {
        send_error(&mut socket, "query echo was not valid JSON").await;
        return;
    }

    let reply = match state.pending.take(&request_id) {
        Some(PendingQuery::Dataset(query)) => match state.samples.dataset_points(&query.dataset_id)
        {
            Some(points) => json!({ "data": points }),
            None => json!({ "error": format!("dataset not found: {}", query.dataset_id) }),
        },
        Some(PendingQuery::Nearby(query)) => {
            json!({ "data": state.samples.nearby_points(&query) })
        }
        None => json!({ "error": "unknown request id" }),
    };

    if let Err(e) = socket.send(Message::Text(reply.to_string())).await {
        warn!("stream send failed: {request_id} -> {e}");
        return;
    }
    let _ = socket.send(Message::Close(None)).await;
    info!("stream complete: {request_id}");
}

async fn send_error(socket: &mut WebSocket, message: &str) {
    let reply = json!({ "error": message });
    let _ = socket.send(Message::Text(reply.to_string())).await;
    let _ = socket.send(Message::Close(None)).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registrations_are_consumed_once() {
        let pending = PendingRequests::new();
        let id = mint_request_id();
        pending.register(id.clone(), PendingQuery::Dataset(DatasetQuery::new("abc")));
        assert_eq!(pending.len(), 1);

        assert!(pending.take(&id).is_some());
        assert!(pending.take(&id).is_none());
        assert_eq!(pending.len(), 0);
    }

    #[test]
    fn minted_ids_are_unique_and_prefixed() {
        let a = mint_request_id();
        let b = mint_request_id();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("req-"));
    }
}
