use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::response::FieldValue;

/// One `(value, count)` facet bucket. `value` is `None` for the missing-value bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    pub value: Option<String>,
    pub count: u64,
}

impl FacetCount {
    pub fn new(value: impl Into<String>, count: u64) -> Self {
        Self {
            value: Some(value.into()),
            count,
        }
    }

    pub fn missing(count: u64) -> Self {
        Self { value: None, count }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: String,
    pub fields: BTreeMap<String, FieldValue>,
    /// Highlight fragments joined with [`crate::constants::SNIPPET_SEPARATOR`]; empty if none.
    pub snippet: String,
    pub matches: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub total_results: u64,
    pub results_count: usize,
    pub elapsed_ms: u64,
    /// Set by the gateway when the response is built, not taken from the backend.
    pub timestamp: DateTime<Utc>,
    /// Keyed by facet field, in the order the facets were requested.
    pub facets_map: IndexMap<String, Vec<FacetCount>>,
}
