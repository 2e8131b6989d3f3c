use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::try_join_all;
use tracing::{debug, info, instrument};

use super::error::{Dependency, ServiceError};
use crate::backend::SearchBackend;
use crate::cache::EmbeddingCache;
use crate::config::DeploymentConfig;
use crate::model::{SearchRequest, SearchResponse};
use crate::query::QueryTranslator;
use crate::response::ResponseMapper;

/// Runs one search end to end: validate, embed, translate, query, map.
pub struct SearchService {
    translator: QueryTranslator,
    mapper: ResponseMapper,
    cache: Arc<EmbeddingCache>,
    backend: Arc<dyn SearchBackend>,
    backend_timeout: Duration,
}

impl SearchService {
    pub fn new(
        deployment: Arc<DeploymentConfig>,
        cache: Arc<EmbeddingCache>,
        backend: Arc<dyn SearchBackend>,
        backend_timeout: Duration,
    ) -> Self {
        Self {
            translator: QueryTranslator::new(Arc::clone(&deployment)),
            mapper: ResponseMapper::new(deployment),
            cache,
            backend,
            backend_timeout,
        }
    }

    pub fn deployment(&self) -> &DeploymentConfig {
        self.translator.deployment()
    }

    pub fn cache(&self) -> &Arc<EmbeddingCache> {
        &self.cache
    }

    pub fn backend(&self) -> &Arc<dyn SearchBackend> {
        &self.backend
    }

    #[instrument(skip_all, fields(strategy = %request.strategy, offset = request.offset))]
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, ServiceError> {
        self.translator.validate(request)?;

        let vectors = self.resolve_vectors(request).await?;
        let query = self.translator.translate(request, &vectors)?;

        let collection = &self.deployment().collection;
        let result = tokio::time::timeout(self.backend_timeout, self.backend.query(collection, &query))
            .await
            .map_err(|_| ServiceError::DependencyTimeout {
                dependency: Dependency::SearchBackend,
                timeout: self.backend_timeout,
            })??;

        let response = self.mapper.map(result, request);
        info!(
            total_results = response.total_results,
            results = response.results_count,
            backend_ms = response.elapsed_ms,
            "Search complete"
        );
        Ok(response)
    }

    /// Embeds the query text once per selected vector field, all fields concurrently.
    async fn resolve_vectors(
        &self,
        request: &SearchRequest,
    ) -> Result<HashMap<String, Arc<Vec<f32>>>, ServiceError> {
        let fields = self.translator.vector_fields_for(request)?;
        if fields.is_empty() {
            return Ok(HashMap::new());
        }

        let resolved = try_join_all(fields.into_iter().map(|field| async move {
            let vector = self
                .cache
                .resolve_with(field.endpoint.as_deref(), &request.query)
                .await?;
            Ok::<_, ServiceError>((field.name.clone(), vector))
        }))
        .await?;

        debug!(fields = resolved.len(), "Resolved query embeddings");
        Ok(resolved.into_iter().collect())
    }
}
