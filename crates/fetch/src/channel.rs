//! Phase-two subscription channel.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use protocol::{RequestId, StreamPayload};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use crate::error::StreamError;
use crate::BoxFuture;

/// One live subscription, bound to exactly one correlation id.
///
/// Lifecycle: open → message(s) → closed. Once `close` consumes the
/// subscription nothing can be delivered from it again.
pub trait Subscription: Send {
    /// Send the original query JSON; the protocol requires this right
    /// after open.
    fn send(&mut self, payload: Value) -> BoxFuture<'_, Result<(), StreamError>>;

    /// Await the next payload. `Ok(None)` means the peer closed first.
    fn next(&mut self) -> BoxFuture<'_, Result<Option<StreamPayload>, StreamError>>;

    /// Tear the subscription down.
    fn close(self: Box<Self>) -> BoxFuture<'static, ()>;
}

/// Opens subscriptions keyed by correlation id.
pub trait StreamChannel: Send + Sync {
    fn open(
        &self,
        request_id: RequestId,
    ) -> BoxFuture<'_, Result<Box<dyn Subscription>, StreamError>>;
}

/// WebSocket channel: connects to `<ws_base><request_id>`.
pub struct WsChannel {
    ws_base: String,
}

impl WsChannel {
    pub fn new(ws_base: impl Into<String>) -> Self {
        Self {
            ws_base: ws_base.into(),
        }
    }
}

impl StreamChannel for WsChannel {
    fn open(
        &self,
        request_id: RequestId,
    ) -> BoxFuture<'_, Result<Box<dyn Subscription>, StreamError>> {
        Box::pin(async move {
            let url = format!("{}{}", self.ws_base, request_id);
            let (stream, _resp) = tokio_tungstenite::connect_async(&url)
                .await
                .map_err(|e| StreamError::Connect(e.to_string()))?;
            debug!("stream open: {url}");
            Ok(Box::new(WsSubscription { stream, request_id }) as Box<dyn Subscription>)
        })
    }
}

struct WsSubscription {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    request_id: RequestId,
}

impl Subscription for WsSubscription {
    fn send(&mut self, payload: Value) -> BoxFuture<'_, Result<(), StreamError>> {
        Box::pin(async move {
            self.stream
                .send(Message::Text(payload.to_string()))
                .await
                .map_err(|e| StreamError::Connect(e.to_string()))
        })
    }

    fn next(&mut self) -> BoxFuture<'_, Result<Option<StreamPayload>, StreamError>> {
        Box::pin(async move {
            while let Some(frame) = self.stream.next().await {
                let frame = frame.map_err(|e| StreamError::Connect(e.to_string()))?;
                match frame {
                    Message::Text(text) => {
                        let payload: StreamPayload = serde_json::from_str(&text)
                            .map_err(|e| StreamError::Malformed(e.to_string()))?;
                        return Ok(Some(payload));
                    }
                    Message::Binary(_) => {
                        return Err(StreamError::Malformed(
                            "unexpected binary frame".to_string(),
                        ));
                    }
                    // tungstenite answers pings during polling.
                    Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
                    Message::Close(_) => {
                        debug!("stream closed by peer: {}", self.request_id);
                        return Ok(None);
                    }
                }
            }
            Ok(None)
        })
    }

    fn close(mut self: Box<Self>) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            if let Err(e) = self.stream.close(None).await {
                warn!("stream close failed: {} -> {e}", self.request_id);
            }
        })
    }
}

/// What a scripted in-memory subscription does on each `next()`.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptedEvent {
    Deliver(StreamPayload),
    Fail(StreamError),
    Close,
}

#[derive(Default)]
struct MemoryChannelState {
    scripts: HashMap<String, VecDeque<ScriptedEvent>>,
    opened: Vec<RequestId>,
    sent: Vec<(RequestId, Value)>,
}

/// Scripted in-memory channel for tests and offline use.
///
/// Opening an unscripted correlation id fails, so tests can assert phase
/// two was never attempted by checking `opened()`.
#[derive(Default, Clone)]
pub struct MemoryChannel {
    state: Arc<Mutex<MemoryChannelState>>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn script(&self, request_id: &str, events: Vec<ScriptedEvent>) {
        self.state
            .lock()
            .await
            .scripts
            .insert(request_id.to_string(), events.into());
    }

    /// Correlation ids opened so far, in order.
    pub async fn opened(&self) -> Vec<RequestId> {
        self.state.lock().await.opened.clone()
    }

    /// Query JSON sent over each subscription, in order.
    pub async fn sent(&self) -> Vec<(RequestId, Value)> {
        self.state.lock().await.sent.clone()
    }
}

impl StreamChannel for MemoryChannel {
    fn open(
        &self,
        request_id: RequestId,
    ) -> BoxFuture<'_, Result<Box<dyn Subscription>, StreamError>> {
        Box::pin(async move {
            let mut state = self.state.lock().await;
            state.opened.push(request_id.clone());
            let events = state
                .scripts
                .remove(request_id.as_str())
                .ok_or_else(|| {
                    StreamError::Connect(format!("no scripted stream for {request_id}"))
                })?;
            Ok(Box::new(MemorySubscription {
                request_id,
                events,
                shared: Arc::clone(&self.state),
            }) as Box<dyn Subscription>)
        })
    }
}

struct MemorySubscription {
    request_id: RequestId,
    events: VecDeque<ScriptedEvent>,
    shared: Arc<Mutex<MemoryChannelState>>,
}

impl Subscription for MemorySubscription {
    fn send(&mut self, payload: Value) -> BoxFuture<'_, Result<(), StreamError>> {
        Box::pin(async move {
            self.shared
                .lock()
                .await
                .sent
                .push((self.request_id.clone(), payload));
            Ok(())
        })
    }

    fn next(&mut self) -> BoxFuture<'_, Result<Option<StreamPayload>, StreamError>> {
        Box::pin(async move {
            match self.events.pop_front() {
                Some(ScriptedEvent::Deliver(payload)) => Ok(Some(payload)),
                Some(ScriptedEvent::Fail(error)) => Err(error),
                Some(ScriptedEvent::Close) | None => Ok(None),
            }
        })
    }

    fn close(self: Box<Self>) -> BoxFuture<'static, ()> {
        Box::pin(async {})
    }
}
