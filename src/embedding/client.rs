use std::fmt;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::EmbeddingError;

/// How the gateway produces embeddings. Reported by `/ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderMode {
    Remote,
    Stub,
    Mock,
}

impl EmbedderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbedderMode::Remote => "remote",
            EmbedderMode::Stub => "stub",
            EmbedderMode::Mock => "mock",
        }
    }
}

impl fmt::Display for EmbedderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
/// Produces a fixed-length vector for a text string.
pub trait EmbeddingClient: Send + Sync {
    /// Embeds `text`. `endpoint` overrides the client's default service when set.
    async fn embed(&self, endpoint: Option<&str>, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    fn mode(&self) -> EmbedderMode;
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

/// JSON-over-HTTP embedding service client: `POST <endpoint>/embed`.
#[derive(Debug, Clone)]
pub struct HttpEmbeddingClient {
    endpoint: String,
    http: HttpClient,
}

impl HttpEmbeddingClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(endpoint, HttpClient::new())
    }

    pub fn with_client(endpoint: impl Into<String>, http: HttpClient) -> Self {
        Self {
            endpoint: endpoint.into(),
            http,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn embed_url(endpoint: &str) -> String {
        format!("{}/embed", endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl EmbeddingClient for HttpEmbeddingClient {
    async fn embed(&self, endpoint: Option<&str>, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let endpoint = endpoint.unwrap_or(&self.endpoint);
        let url = Self::embed_url(endpoint);
        debug!(%url, text_len = text.len(), "Requesting embedding");

        let resp = self
            .http
            .post(&url)
            .json(&EmbedRequest { text })
            .send()
            .await
            .map_err(|e| EmbeddingError::Request {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(EmbeddingError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body: EmbedResponse =
            resp.json()
                .await
                .map_err(|e| EmbeddingError::InvalidResponse {
                    reason: e.to_string(),
                })?;

        Ok(body.embedding)
    }

    fn mode(&self) -> EmbedderMode {
        EmbedderMode::Remote
    }
}
