use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use super::params::TranslatedQuery;
use super::projection::FieldProjection;
use super::vector::{QueryFragment, VectorQueryResolver};
use crate::config::{DeploymentConfig, VectorFieldConfig};
use crate::constants::MAX_RESULT_WINDOW;
use crate::model::{FacetRequest, HighlightRequest, SearchRequest, SearchStrategy};
use crate::service::ServiceError;

const MATCH_ALL: &str = "*:*";

/// Turns a [`SearchRequest`] into backend parameters for one deployment.
#[derive(Debug, Clone)]
pub struct QueryTranslator {
    deployment: Arc<DeploymentConfig>,
    resolver: VectorQueryResolver,
}

impl QueryTranslator {
    pub fn new(deployment: Arc<DeploymentConfig>) -> Self {
        let resolver = VectorQueryResolver::new(deployment.id_field.clone());
        Self {
            deployment,
            resolver,
        }
    }

    pub fn deployment(&self) -> &DeploymentConfig {
        &self.deployment
    }

    pub fn projection(&self, request: &SearchRequest) -> FieldProjection {
        FieldProjection::for_request(&self.deployment, request)
    }

    /// Rejects requests that can never be translated. Runs before any embedding call.
    pub fn validate(&self, request: &SearchRequest) -> Result<(), ServiceError> {
        if let Some(limit) = request.limit {
            if limit == 0 {
                return Err(ServiceError::client("limit must be greater than 0"));
            }
            if limit > self.deployment.max_page_size {
                return Err(ServiceError::client(format!(
                    "limit {} exceeds the maximum page size {}",
                    limit, self.deployment.max_page_size
                )));
            }
        }

        let rows = u64::from(request.limit.unwrap_or(self.deployment.default_page_size));
        match request.offset.checked_add(rows) {
            Some(end) if end <= MAX_RESULT_WINDOW => {}
            _ => {
                return Err(ServiceError::client(format!(
                    "offset {} plus page size {} exceeds the result window {}",
                    request.offset, rows, MAX_RESULT_WINDOW
                )));
            }
        }

        if request.strategy.uses_vectors() && request.is_blank() {
            return Err(ServiceError::client(format!(
                "strategy '{}' requires query text",
                request.strategy
            )));
        }

        self.vector_fields_for(request)?;
        Ok(())
    }

    /// Vector fields the request will use, in configuration order (or request order when named).
    ///
    /// Empty for [`SearchStrategy::Keyword`].
    pub fn vector_fields_for(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<&VectorFieldConfig>, ServiceError> {
        if !request.strategy.uses_vectors() {
            return Ok(Vec::new());
        }

        if self.deployment.vector_fields.is_empty() {
            return Err(ServiceError::client(format!(
                "strategy '{}' requires vector fields, but none are configured",
                request.strategy
            )));
        }

        if request.vector_fields.is_empty() {
            return Ok(self.deployment.vector_fields.iter().collect());
        }

        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(request.vector_fields.len());
        for name in &request.vector_fields {
            let field = self
                .deployment
                .find_vector_field(name)
                .ok_or_else(|| ServiceError::client(format!("unknown vector field '{}'", name)))?;
            if seen.insert(field.name.as_str()) {
                fields.push(field);
            }
        }
        Ok(fields)
    }

    /// Builds the backend query. `vectors` maps logical vector field names to their embeddings
    /// and must cover every field returned by [`QueryTranslator::vector_fields_for`].
    pub fn translate(
        &self,
        request: &SearchRequest,
        vectors: &HashMap<String, Arc<Vec<f32>>>,
    ) -> Result<TranslatedQuery, ServiceError> {
        self.validate(request)?;

        let mut query = TranslatedQuery::new();

        let fragments = self
            .vector_fields_for(request)?
            .into_iter()
            .map(|field| {
                let vector = vectors.get(&field.name).ok_or_else(|| {
                    ServiceError::Internal(format!("no embedding resolved for '{}'", field.name))
                })?;
                Ok((field.name.as_str(), self.resolver.build_fragment(field, vector)))
            })
            .collect::<Result<Vec<_>, ServiceError>>()?;

        match request.strategy {
            SearchStrategy::Keyword => self.keyword_query(&mut query, request),
            SearchStrategy::Semantic => {
                let clause = vector_clause(&mut query, fragments);
                query.set("q", clause);
            }
            SearchStrategy::KeywordWithSemanticBoost => {
                self.hybrid_query(&mut query, request, fragments, "kq", "vq");
            }
            SearchStrategy::SemanticWithKeywordBoost => {
                self.hybrid_query(&mut query, request, fragments, "vq", "kq");
            }
        }

        let limit = request.limit.unwrap_or(self.deployment.default_page_size);
        query.set("start", request.offset.to_string());
        query.set("rows", limit.to_string());
        query.set_field_list(self.projection(request).field_list());

        for filter in &request.filters {
            query.append("fq", filter.as_str());
        }

        if let Some(sort) = request.sort.as_ref().or(self.deployment.default_sort.as_ref()) {
            query.set("sort", sort.to_param());
        }

        apply_facets(&mut query, &request.facets);

        if let Some(highlight) = &request.highlight {
            self.apply_highlight(&mut query, request, highlight);
        }

        debug!(
            strategy = %request.strategy,
            vector_fields = vectors.len(),
            params = query.len(),
            "Translated search request"
        );

        Ok(query)
    }

    fn keyword_fields(&self) -> String {
        self.deployment.keyword_fields.join(" ")
    }

    fn keyword_query(&self, query: &mut TranslatedQuery, request: &SearchRequest) {
        let text = if request.is_blank() {
            MATCH_ALL
        } else {
            request.query.as_str()
        };
        query.set("q", text);
        query.set("defType", "edismax");
        query.set("qf", self.keyword_fields());
    }

    /// Sets `kq`/`qq` (keyword) and `vq` (vector) clauses, then combines them with the
    /// secondary one down-weighted by the deployment's hybrid boost.
    fn hybrid_query(
        &self,
        query: &mut TranslatedQuery,
        request: &SearchRequest,
        fragments: Vec<(&str, QueryFragment)>,
        primary: &str,
        secondary: &str,
    ) {
        query.set("qq", request.query.as_str());
        query.set("kq", format!("{{!edismax qf='{}' v=$qq}}", self.keyword_fields()));

        let clause = vector_clause(query, fragments);
        query.set("vq", clause);

        query.set(
            "boosted",
            format!("{{!boost b={} v=${}}}", self.deployment.hybrid_boost, secondary),
        );
        query.set("q", format!("{{!bool should=${} should=$boosted}}", primary));
    }

    fn apply_highlight(
        &self,
        query: &mut TranslatedQuery,
        request: &SearchRequest,
        highlight: &HighlightRequest,
    ) {
        let fields = if highlight.fields.is_empty() {
            self.deployment.keyword_fields.join(",")
        } else {
            highlight.fields.join(",")
        };

        query.set("hl", "true");
        query.set("hl.fl", fields);
        if let Some(size) = highlight.fragment_size {
            query.set("hl.fragsize", size.to_string());
        }
        if let Some(snippets) = highlight.snippets {
            query.set("hl.snippets", snippets.to_string());
        }
        // The main query is a vector fragment; highlight against the text instead.
        if request.strategy.uses_vectors() {
            query.set("hl.q", request.query.as_str());
        }
    }
}

/// Returns the single fragment, or a `should` union over `vq.<name>` params.
fn vector_clause(query: &mut TranslatedQuery, fragments: Vec<(&str, QueryFragment)>) -> String {
    if let [(_, fragment)] = fragments.as_slice() {
        return fragment.to_string();
    }

    let mut clauses = Vec::with_capacity(fragments.len());
    for (name, fragment) in fragments {
        let param = format!("vq.{}", name);
        clauses.push(format!("should=${}", param));
        query.set(param, fragment.into_string());
    }
    format!("{{!bool {}}}", clauses.join(" "))
}

fn apply_facets(query: &mut TranslatedQuery, facets: &[FacetRequest]) {
    if facets.is_empty() {
        return;
    }

    query.set("facet", "true");
    for facet in facets {
        let field = facet.field.as_str();
        match &facet.range {
            Some(range) => {
                query.append("facet.range", field);
                query.set(format!("f.{field}.facet.range.start"), range.start.to_string());
                query.set(format!("f.{field}.facet.range.end"), range.end.to_string());
                query.set(format!("f.{field}.facet.range.gap"), range.gap.to_string());
            }
            None => query.append("facet.field", field),
        }
        if let Some(limit) = facet.limit {
            query.set(format!("f.{field}.facet.limit"), limit.to_string());
        }
        if facet.missing {
            query.set(format!("f.{field}.facet.missing"), "true");
        }
    }
}
