//! Socket-level coverage of the two-phase exchange against an in-process
//! axum backend: POST mints a correlation id, the WebSocket route keyed
//! by that id reads the echoed query and answers `{"data"}` / `{"error"}`.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use fetch::{
    FetchError, FetchState, HttpTransport, Loader, RequestDescriptor, StreamChannel,
    StreamError, Transport, WsChannel,
};
use protocol::{
    DatasetQuery, Envelope, Feature, FeatureCollection, PlaceProperties, RequestId,
    ServiceConfig,
};
use serde_json::{json, Value};
use tokio::sync::Mutex;

#[derive(Clone, Default)]
struct StubState {
    pending: Arc<Mutex<HashMap<String, DatasetQuery>>>,
}

async fn fetch_dataset(
    State(state): State<StubState>,
    Json(query): Json<DatasetQuery>,
) -> Json<Envelope<Value>> {
    let request_id = format!("req-{}", uuid::Uuid::new_v4());
    state
        .pending
        .lock()
        .await
        .insert(request_id.clone(), query);
    Json(Envelope {
        message: "Request received".to_string(),
        request_id: RequestId::new(request_id),
        data: json!(""),
    })
}

async fn ws_route(
    State(state): State<StubState>,
    Path(request_id): Path<String>,
    upgrade: WebSocketUpgrade,
) -> axum::response::Response {
    upgrade.on_upgrade(move |socket| serve_stream(socket, request_id, state))
}

async fn serve_stream(mut socket: WebSocket, request_id: String, state: StubState) {
    // Protocol: the client repeats its query as the first text frame.
    let echoed = match socket.recv().await {
        Some(Ok(Message::Text(text))) => text,
        _ => return,
    };
    let _query: Value = serde_json::from_str(&echoed).unwrap_or(Value::Null);

    let reply = match state.pending.lock().await.remove(&request_id) {
        Some(query) if query.dataset_id == "abc" => {
            let points = FeatureCollection::new(vec![Feature::point(
                39.17757,
                22.4925,
                PlaceProperties::default(),
            )]);
            json!({"data": points})
        }
        Some(query) => json!({"error": format!("dataset not found: {}", query.dataset_id)}),
        None => json!({"error": "unknown request id"}),
    };

    let _ = socket
        .send(Message::Text(reply.to_string()))
        .await;
    let _ = socket.send(Message::Close(None)).await;
}

async fn spawn_stub() -> SocketAddr {
    let state = StubState::default();
    let app = Router::new()
        .route("/fetch-dataset", post(fetch_dataset))
        .route("/ws/:request_id", get(ws_route))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

fn loader_for(addr: SocketAddr) -> Loader<FeatureCollection> {
    let config = ServiceConfig::new(format!("http://{addr}"), format!("ws://{addr}/ws/"));
    let channel = WsChannel::new(config.ws_base.clone());
    Loader::new(
        Arc::new(HttpTransport::new(config)) as Arc<dyn Transport>,
        Arc::new(channel) as Arc<dyn StreamChannel>,
    )
}

#[tokio::test]
async fn full_exchange_ends_ready() {
    let addr = spawn_stub().await;
    let loader = loader_for(addr);

    let query = serde_json::to_value(DatasetQuery::new("abc")).expect("encode query");
    let handle = loader.load(RequestDescriptor::post("/fetch-dataset", query));

    match handle.terminal().await {
        FetchState::Ready(outcome) => {
            assert_eq!(outcome.data.len(), 1);
            assert_eq!(outcome.data.center(), Some([39.17757, 22.4925]));
            assert!(outcome.request_id.as_str().starts_with("req-"));
        }
        other => panic!("expected ready, got {other:?}"),
    }
}

#[tokio::test]
async fn backend_stream_error_ends_failed() {
    let addr = spawn_stub().await;
    let loader = loader_for(addr);

    let query = serde_json::to_value(DatasetQuery::new("missing")).expect("encode query");
    let handle = loader.load(RequestDescriptor::post("/fetch-dataset", query));

    match handle.terminal().await {
        FetchState::Failed(FetchError::Stream(StreamError::Remote(message))) => {
            assert_eq!(message, "dataset not found: missing");
        }
        other => panic!("expected remote stream error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_backend_fails_phase_one() {
    // Nothing listens on this address; phase one must fail and no
    // subscription is attempted.
    let config = ServiceConfig::new("http://127.0.0.1:9", "ws://127.0.0.1:9/ws/");
    let channel = WsChannel::new(config.ws_base.clone());
    let loader: Loader<FeatureCollection> = Loader::new(
        Arc::new(HttpTransport::new(config)) as Arc<dyn Transport>,
        Arc::new(channel) as Arc<dyn StreamChannel>,
    );

    let query = serde_json::to_value(DatasetQuery::new("abc")).expect("encode query");
    let handle = loader.load(RequestDescriptor::post("/fetch-dataset", query));

    match handle.terminal().await {
        FetchState::Failed(FetchError::Transport(_)) => {}
        other => panic!("expected transport failure, got {other:?}"),
    }
}
