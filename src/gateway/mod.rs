//! HTTP gateway (Axum) for the search RPC.
//!
//! This module is primarily used by the `semgate` server binary.

pub mod error;
pub mod handler;
pub mod state;


use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{Span, warn};
use uuid::Uuid;

use crate::cache::CacheStats;
use crate::embedding::EmbedderMode;

pub use error::{ErrorResponse, GatewayError};
pub use handler::search_handler;
pub use state::GatewayState;

/// Response header carrying a short machine-readable outcome.
pub const SEMGATE_STATUS_HEADER: &str = "x-semgate-status";
pub const STATUS_HEALTHY: &str = "healthy";
pub const STATUS_READY: &str = "ready";
pub const STATUS_ERROR: &str = "error";

/// Upper bound on the backend ping made by `/ready`.
pub const READY_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

pub fn create_router_with_state(state: GatewayState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/v1/search", post(search_handler))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .with_state(state)
}

fn request_span(request: &Request) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %Uuid::new_v4(),
    )
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub backend: &'static str,
    pub embedder_mode: EmbedderMode,
    pub cache: CacheStats,
}

fn status_headers(value: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(SEMGATE_STATUS_HEADER, HeaderValue::from_static(value));
    headers
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    (
        StatusCode::OK,
        status_headers(STATUS_HEALTHY),
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<GatewayState>) -> Response {
    let service = &state.service;
    let collection = &service.deployment().collection;

    let backend_status =
        match tokio::time::timeout(READY_PROBE_TIMEOUT, service.backend().health_check(collection))
            .await
        {
            Ok(Ok(())) => STATUS_READY,
            Ok(Err(e)) => {
                warn!(error = %e, "Search backend not ready");
                STATUS_ERROR
            }
            Err(_) => {
                warn!(timeout = ?READY_PROBE_TIMEOUT, "Search backend ping timed out");
                STATUS_ERROR
            }
        };

    let components = ComponentStatus {
        http: STATUS_READY,
        backend: backend_status,
        embedder_mode: service.cache().embedder_mode(),
        cache: service.cache().stats().await,
    };

    let is_ready = components.backend == STATUS_READY;
    let (status_code, status_msg) = if is_ready {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "pending")
    };

    (
        status_code,
        status_headers(if is_ready { STATUS_READY } else { STATUS_ERROR }),
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
