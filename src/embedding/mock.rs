use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::client::{EmbedderMode, EmbeddingClient};
use super::error::EmbeddingError;
use super::stub::stub_vector;

/// Counting embedder for tests.
///
/// Returns fixed vectors registered with [`MockEmbeddingClient::with_vector`], otherwise stub
/// vectors. Can be made slow or failing.
#[derive(Debug, Default)]
pub struct MockEmbeddingClient {
    dimension: usize,
    delay: Option<Duration>,
    fixed: RwLock<HashMap<String, Vec<f32>>>,
    failure: RwLock<Option<EmbeddingError>>,
    calls: AtomicUsize,
    calls_by_text: RwLock<HashMap<String, usize>>,
    endpoints: RwLock<Vec<Option<String>>>,
}

impl MockEmbeddingClient {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            ..Default::default()
        }
    }

    /// Sleeps this long inside every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Returns `vector` (whatever its length) for `text`.
    pub fn with_vector(self, text: &str, vector: Vec<f32>) -> Self {
        self.fixed.write().insert(text.to_string(), vector);
        self
    }

    /// Makes every following call fail with `err` until [`MockEmbeddingClient::recover`].
    pub fn fail_with(&self, err: EmbeddingError) {
        *self.failure.write() = Some(err);
    }

    pub fn recover(&self) {
        *self.failure.write() = None;
    }

    /// Total number of `embed` calls, including failed ones.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn calls_for(&self, text: &str) -> usize {
        self.calls_by_text.read().get(text).copied().unwrap_or(0)
    }

    /// Endpoint override passed to each call, in call order.
    pub fn endpoints(&self) -> Vec<Option<String>> {
        self.endpoints.read().clone()
    }
}

#[async_trait]
impl EmbeddingClient for MockEmbeddingClient {
    async fn embed(&self, endpoint: Option<&str>, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .calls_by_text
            .write()
            .entry(text.to_string())
            .or_insert(0) += 1;
        self.endpoints.write().push(endpoint.map(str::to_string));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self.failure.read().clone();
        if let Some(err) = failure {
            return Err(err);
        }

        let fixed = self.fixed.read().get(text).cloned();
        Ok(fixed.unwrap_or_else(|| stub_vector(text, self.dimension)))
    }

    fn mode(&self) -> EmbedderMode {
        EmbedderMode::Mock
    }
}
