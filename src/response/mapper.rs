use std::sync::Arc;

use chrono::Utc;

use super::facets::FacetProcessor;
use super::value::FieldValue;
use crate::backend::{BackendResult, BackendRow, DocHighlights};
use crate::config::DeploymentConfig;
use crate::constants::SNIPPET_SEPARATOR;
use crate::model::{SearchRequest, SearchResponse, SearchResult};
use crate::query::FieldProjection;

/// Converts backend results into caller responses.
#[derive(Debug, Clone)]
pub struct ResponseMapper {
    deployment: Arc<DeploymentConfig>,
    facets: FacetProcessor,
}

impl ResponseMapper {
    pub fn new(deployment: Arc<DeploymentConfig>) -> Self {
        Self {
            deployment,
            facets: FacetProcessor,
        }
    }

    pub fn map(&self, result: BackendResult, request: &SearchRequest) -> SearchResponse {
        let projection = FieldProjection::for_request(&self.deployment, request);
        let BackendResult {
            rows,
            num_found,
            elapsed_ms,
            highlighting,
            facets,
        } = result;

        let results: Vec<SearchResult> = rows
            .into_iter()
            .map(|row| {
                let highlights = highlighting.as_ref().and_then(|h| h.get(&row.id));
                map_row(row, &projection, highlights)
            })
            .collect();

        SearchResponse {
            results_count: results.len(),
            results,
            total_results: num_found,
            elapsed_ms,
            timestamp: Utc::now(),
            facets_map: self.facets.process(&request.facets, facets.as_ref()),
        }
    }
}

fn map_row(
    row: BackendRow,
    projection: &FieldProjection,
    highlights: Option<&DocHighlights>,
) -> SearchResult {
    let fields = row
        .fields
        .into_iter()
        .filter(|(name, _)| !projection.is_excluded(name))
        .map(|(name, value)| (name, FieldValue::from(value)))
        .collect();

    let matches: Vec<String> = highlights
        .into_iter()
        .flatten()
        .flat_map(|(_, fragments)| fragments.iter().cloned())
        .collect();

    SearchResult {
        id: row.id,
        fields,
        snippet: matches.join(SNIPPET_SEPARATOR),
        matches,
    }
}
