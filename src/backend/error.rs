use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by search backend operations.
pub enum BackendError {
    /// Could not reach the backend.
    #[error("failed to connect to search backend at '{url}': {message}")]
    ConnectionFailed { url: String, message: String },

    /// Backend answered with a non-success status.
    #[error("search on '{collection}' failed with HTTP {status}: {body}")]
    Status {
        collection: String,
        status: u16,
        /// Leading part of the response body.
        body: String,
    },

    /// Backend answered with something that is not a select response.
    #[error("invalid search backend response: {message}")]
    InvalidResponse { message: String },
}

impl BackendError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        BackendError::InvalidResponse {
            message: message.into(),
        }
    }
}
