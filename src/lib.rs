//! semgate library crate (used by the server binary and integration tests).
//!
//! # Public API Surface
//!
//! ## Request path
//! - [`SearchService`] - validate, embed, translate, query, map
//! - [`QueryTranslator`], [`VectorQueryResolver`] - request → backend parameters
//! - [`ResponseMapper`], [`FacetProcessor`] - backend rows → [`SearchResponse`]
//!
//! ## Dependencies
//! - [`EmbeddingCache`] - memoized embeddings with an rkyv snapshot
//! - [`EmbeddingClient`], [`HttpEmbeddingClient`], [`StubEmbeddingClient`]
//! - [`SearchBackend`], [`SolrClient`]
//!
//! ## Configuration
//! - [`Config`] - `SEMGATE_*` process settings
//! - [`DeploymentConfig`] - collection, fields and vector fields (JSON file)
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod backend;
pub mod cache;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod hashing;
pub mod model;
pub mod query;
pub mod response;
pub mod service;

pub use backend::{BackendError, BackendResult, SearchBackend, SolrClient};
#[cfg(any(test, feature = "mock"))]
pub use backend::MockSearchBackend;
pub use cache::{CacheError, CacheStats, EmbeddingCache, EmbeddingCacheConfig};
pub use config::{Config, ConfigError, DeploymentConfig, VectorFieldConfig, VectorTopology};
pub use constants::{DimValidationError, validate_embedding_dim};
pub use embedding::{
    EmbedderMode, EmbeddingClient, EmbeddingError, HttpEmbeddingClient, StubEmbeddingClient,
};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbeddingClient;
pub use hashing::{hash_content, hash_text};
pub use model::{
    FacetCount, FacetRequest, SearchRequest, SearchResponse, SearchResult, SearchStrategy,
};
pub use query::{QueryFragment, QueryTranslator, TranslatedQuery, VectorQueryResolver};
pub use response::{FacetProcessor, FieldValue, ResponseMapper};
pub use service::{Dependency, SearchService, ServiceError};
