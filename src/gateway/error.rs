use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::SEMGATE_STATUS_HEADER;
use crate::service::ServiceError;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Body could not be decoded into a search request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::Service(err) => match err {
                ServiceError::Client(_) => StatusCode::BAD_REQUEST,
                ServiceError::DependencyTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                ServiceError::DependencyFailure { .. } => StatusCode::BAD_GATEWAY,
                ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::InvalidRequest(_) => "invalid_request",
            GatewayError::Service(err) => err.code(),
        }
    }

    pub fn is_retriable(&self) -> bool {
        matches!(self, GatewayError::Service(err) if err.is_retriable())
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub retriable: bool,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let mut headers = HeaderMap::new();
        headers.insert(SEMGATE_STATUS_HEADER, HeaderValue::from_static(code));

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
            retriable: self.is_retriable(),
        });

        (status, headers, body).into_response()
    }
}
