use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::client::SearchBackend;
use super::error::BackendError;
use super::model::BackendResult;
use crate::query::TranslatedQuery;

/// In-memory backend returning a canned result and recording every query.
#[derive(Debug)]
pub struct MockSearchBackend {
    result: RwLock<BackendResult>,
    delay: Option<Duration>,
    failure: RwLock<Option<String>>,
    healthy: AtomicBool,
    queries: RwLock<Vec<(String, TranslatedQuery)>>,
}

impl Default for MockSearchBackend {
    fn default() -> Self {
        Self::new(BackendResult::default())
    }
}

impl MockSearchBackend {
    pub fn new(result: BackendResult) -> Self {
        Self {
            result: RwLock::new(result),
            delay: None,
            failure: RwLock::new(None),
            healthy: AtomicBool::new(true),
            queries: RwLock::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_result(&self, result: BackendResult) {
        *self.result.write() = result;
    }

    /// Makes every following query fail with an HTTP 500 carrying `message`.
    pub fn fail_with(&self, message: &str) {
        *self.failure.write() = Some(message.to_string());
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn query_count(&self) -> usize {
        self.queries.read().len()
    }

    /// The most recent `(collection, query)` received.
    pub fn last_query(&self) -> Option<(String, TranslatedQuery)> {
        self.queries.read().last().cloned()
    }
}

#[async_trait]
impl SearchBackend for MockSearchBackend {
    async fn query(
        &self,
        collection: &str,
        query: &TranslatedQuery,
    ) -> Result<BackendResult, BackendError> {
        self.queries
            .write()
            .push((collection.to_string(), query.clone()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self.failure.read().clone();
        if let Some(message) = failure {
            return Err(BackendError::Status {
                collection: collection.to_string(),
                status: 500,
                body: message,
            });
        }

        let result = self.result.read().clone();
        Ok(result)
    }

    async fn health_check(&self, collection: &str) -> Result<(), BackendError> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(BackendError::ConnectionFailed {
                url: format!("mock://{}", collection),
                message: "backend marked unhealthy".to_string(),
            })
        }
    }
}
