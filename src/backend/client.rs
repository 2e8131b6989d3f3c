use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::{debug, instrument};

use super::error::BackendError;
use super::model::BackendResult;
use super::parse::parse_select_response;
use crate::query::TranslatedQuery;

const MAX_ERROR_BODY: usize = 512;

#[async_trait]
/// Executes translated queries against a search engine.
pub trait SearchBackend: Send + Sync {
    /// Runs `query` against `collection`.
    async fn query(
        &self,
        collection: &str,
        query: &TranslatedQuery,
    ) -> Result<BackendResult, BackendError>;

    /// Checks that `collection` is reachable.
    async fn health_check(&self, collection: &str) -> Result<(), BackendError>;
}

/// Solr HTTP client: form-encoded `POST <base>/<collection>/select?wt=json`.
#[derive(Debug, Clone)]
pub struct SolrClient {
    base_url: String,
    id_field: String,
    http: HttpClient,
}

impl SolrClient {
    /// Creates a client for `base_url` (e.g. `http://localhost:8983/solr`).
    pub fn new(base_url: impl Into<String>, id_field: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            id_field: id_field.into(),
            http: HttpClient::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, collection: &str, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, collection, path)
    }

    fn connection_error(&self, err: reqwest::Error) -> BackendError {
        BackendError::ConnectionFailed {
            url: self.base_url.clone(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl SearchBackend for SolrClient {
    #[instrument(skip(self, query), fields(params = query.len()))]
    async fn query(
        &self,
        collection: &str,
        query: &TranslatedQuery,
    ) -> Result<BackendResult, BackendError> {
        let url = self.collection_url(collection, "select");

        let mut form = query.pairs();
        form.push(("wt", "json"));

        let resp = self
            .http
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            let mut body = resp.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(BackendError::Status {
                collection: collection.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| BackendError::invalid(e.to_string()))?;

        let result = parse_select_response(body, &self.id_field)?;
        debug!(
            num_found = result.num_found,
            rows = result.rows.len(),
            qtime_ms = result.elapsed_ms,
            "Backend query complete"
        );
        Ok(result)
    }

    async fn health_check(&self, collection: &str) -> Result<(), BackendError> {
        let url = self.collection_url(collection, "admin/ping");
        let resp = self
            .http
            .get(&url)
            .query(&[("wt", "json")])
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;

        if !resp.status().is_success() {
            return Err(BackendError::Status {
                collection: collection.to_string(),
                status: resp.status().as_u16(),
                body: String::new(),
            });
        }
        Ok(())
    }
}
