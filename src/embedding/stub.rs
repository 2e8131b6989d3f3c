use async_trait::async_trait;
use tracing::debug;

use super::client::{EmbedderMode, EmbeddingClient};
use super::error::EmbeddingError;
use crate::hashing::hash_text;

/// Deterministic embedder for running without an embedding service.
///
/// Vectors are pseudo-random, unit length and stable across processes, so cached snapshots stay
/// valid between restarts. They carry no meaning.
#[derive(Debug, Clone)]
pub struct StubEmbeddingClient {
    dimension: usize,
}

impl StubEmbeddingClient {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Generates the stub vector for `text`.
pub fn stub_vector(text: &str, dimension: usize) -> Vec<f32> {
    let digest = hash_text(text);
    let mut seed = [0u8; 8];
    seed.copy_from_slice(&digest[..8]);

    let mut state = u64::from_le_bytes(seed);
    let mut embedding = Vec::with_capacity(dimension);
    for _ in 0..dimension {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
        embedding.push(value);
    }

    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut embedding {
            *x /= norm;
        }
    }

    embedding
}

#[async_trait]
impl EmbeddingClient for StubEmbeddingClient {
    async fn embed(&self, _endpoint: Option<&str>, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        debug!(text_len = text.len(), "Generating stub embedding");
        Ok(stub_vector(text, self.dimension))
    }

    fn mode(&self) -> EmbedderMode {
        EmbedderMode::Stub
    }
}
