use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::{Instrument, Span, debug, instrument, warn};

use crate::gateway::error::GatewayError;
use crate::gateway::state::GatewayState;
use crate::model::{SearchRequest, SearchResponse};
use crate::service::ServiceError;

/// `POST /v1/search`.
///
/// The search runs on its own task: if the caller goes away, in-flight dependency calls still
/// complete (and populate the embedding cache) and the result is dropped.
#[instrument(skip_all, fields(strategy = tracing::field::Empty))]
pub async fn search_handler(
    State(state): State<GatewayState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, GatewayError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!(error = %rejection.body_text(), "Rejected search body");
        GatewayError::InvalidRequest(rejection.body_text())
    })?;
    Span::current().record("strategy", tracing::field::display(request.strategy));

    let service = Arc::clone(&state.service);
    let outcome = tokio::spawn(async move { service.search(&request).await }.instrument(Span::current()))
        .await
        .map_err(|e| ServiceError::Internal(format!("search task failed: {}", e)))?;

    match outcome {
        Ok(response) => Ok(Json(response)),
        Err(err) => {
            warn!(code = err.code(), error = %err, "Search failed");
            Err(err.into())
        }
    }
}
