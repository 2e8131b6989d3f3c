//! Embedding service clients.
//!
//! - [`HttpEmbeddingClient`] talks to a remote service.
//! - [`StubEmbeddingClient`] is used when no service is configured.
//! - `MockEmbeddingClient` counts calls in tests (`mock` feature).

mod client;
mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod stub;


pub use client::{EmbedderMode, EmbeddingClient, HttpEmbeddingClient};
pub use error::EmbeddingError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbeddingClient;
pub use stub::{StubEmbeddingClient, stub_vector};
