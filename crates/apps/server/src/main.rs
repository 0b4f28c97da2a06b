use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Path as AxumPath, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use protocol::{DatasetQuery, Envelope, PlaceQuery, RequestId};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod connections;
mod datasets;

use connections::{PendingQuery, PendingRequests};
use datasets::SampleData;

#[derive(Clone)]
struct AppState {
    pending: Arc<PendingRequests>,
    samples: Arc<SampleData>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let addr: SocketAddr = env::var("CATALOG_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:9200".to_string())
        .parse()
        .expect("invalid CATALOG_ADDR");

    let state = AppState {
        pending: Arc::new(PendingRequests::new()),
        samples: Arc::new(SampleData::new()),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS]);

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/catalog-collection", get(get_catalog_collection))
        .route("/layer-collection", get(get_layer_collection))
        .route("/country-city", get(get_country_city))
        .route("/place-categories", get(get_place_categories))
        .route("/fetch-dataset", post(post_fetch_dataset))
        .route("/fetch-nearby", post(post_fetch_nearby))
        .route("/save-layer", post(post_save_layer))
        .route("/save-catalog", post(post_save_catalog))
        .route("/ws/:request_id", get(ws_upgrade))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    info!("catalog server listening on http://{addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await.unwrap(), app)
        .await
        .unwrap();
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

/// Wrap a payload in the standard envelope with a fresh correlation id.
fn envelope(data: Value) -> Json<Envelope<Value>> {
    Json(Envelope {
        message: "Request received".to_string(),
        request_id: connections::mint_request_id(),
        data,
    })
}

fn api_error(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message.into() })))
}

async fn get_catalog_collection(State(state): State<AppState>) -> Json<Envelope<Value>> {
    envelope(state.samples.catalog_cards())
}

async fn get_layer_collection(State(state): State<AppState>) -> Json<Envelope<Value>> {
    envelope(state.samples.layer_cards())
}

async fn get_country_city(State(state): State<AppState>) -> Json<Envelope<Value>> {
    envelope(state.samples.country_cities())
}

async fn get_place_categories(State(state): State<AppState>) -> Json<Envelope<Value>> {
    envelope(state.samples.place_categories())
}

async fn post_fetch_dataset(
    State(state): State<AppState>,
    Json(query): Json<DatasetQuery>,
) -> Result<Json<Envelope<Value>>, (StatusCode, Json<Value>)> {
    if query.dataset_id.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "dataset id is required"));
    }

    let request_id = connections::mint_request_id();
    state
        .pending
        .register(request_id.clone(), PendingQuery::Dataset(query));

    Ok(Json(Envelope {
        message: "Request received".to_string(),
        request_id,
        data: json!(""),
    }))
}

async fn post_fetch_nearby(
    State(state): State<AppState>,
    Json(query): Json<PlaceQuery>,
) -> Result<Json<Envelope<Value>>, (StatusCode, Json<Value>)> {
    if query.category.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "category is required"));
    }
    if query.radius == 0 {
        return Err(api_error(StatusCode::BAD_REQUEST, "radius must be positive"));
    }

    let request_id = connections::mint_request_id();
    state
        .pending
        .register(request_id.clone(), PendingQuery::Nearby(query));

    Ok(Json(Envelope {
        message: "Request received".to_string(),
        request_id,
        data: json!(""),
    }))
}

async fn post_save_layer(
    Json(body): Json<Value>,
) -> Result<Json<Envelope<Value>>, (StatusCode, Json<Value>)> {
    for field in ["name", "point_color", "legend", "description", "save_method"] {
        if body.get(field).is_none() {
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                format!("{field} is required"),
            ));
        }
    }
    info!(
        "layer saved: {}",
        body["name"].as_str().unwrap_or("<unnamed>")
    );
    Ok(envelope(json!("")))
}

async fn post_save_catalog(
    Json(body): Json<Value>,
) -> Result<Json<Envelope<Value>>, (StatusCode, Json<Value>)> {
    for field in ["catalog_id", "name", "save_method"] {
        if body.get(field).is_none() {
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                format!("{field} is required"),
            ));
        }
    }
    info!(
        "catalog saved: {}",
        body["catalog_id"].as_str().unwrap_or("<unknown>")
    );
    Ok(envelope(json!("")))
}

async fn ws_upgrade(
    State(state): State<AppState>,
    AxumPath(request_id): AxumPath<String>,
    upgrade: WebSocketUpgrade,
) -> Response {
    let request_id = RequestId::new(request_id);
    upgrade.on_upgrade(move |socket| connections::serve_stream(socket, request_id, state))
}
