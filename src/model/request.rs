use std::fmt;

use serde::{Deserialize, Serialize};

/// Blend of keyword and semantic matching requested for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchStrategy {
    /// Free-text query against the configured keyword fields only.
    #[default]
    Keyword,
    /// Vector similarity only.
    Semantic,
    /// Keyword query is primary; vector similarity contributes a down-weighted boost.
    KeywordWithSemanticBoost,
    /// Vector similarity is primary; the keyword query contributes a down-weighted boost.
    SemanticWithKeywordBoost,
}

impl SearchStrategy {
    /// Returns `true` if the strategy needs embeddings.
    #[inline]
    pub fn uses_vectors(&self) -> bool {
        !matches!(self, SearchStrategy::Keyword)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchStrategy::Keyword => "keyword",
            SearchStrategy::Semantic => "semantic",
            SearchStrategy::KeywordWithSemanticBoost => "keywordWithSemanticBoost",
            SearchStrategy::SemanticWithKeywordBoost => "semanticWithKeywordBoost",
        }
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Renders the backend sort parameter: `"<field> <asc|desc>"`.
    pub fn to_param(&self) -> String {
        format!("{} {}", self.field, self.direction.as_str())
    }
}

/// One bound of a range facet. Numbers and date-math strings are both accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeBound {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for RangeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeBound::Int(v) => write!(f, "{}", v),
            RangeBound::Float(v) => write!(f, "{}", v),
            RangeBound::Text(v) => f.write_str(v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeFacet {
    pub start: RangeBound,
    pub end: RangeBound,
    pub gap: RangeBound,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetRequest {
    pub field: String,
    /// Max buckets. Negative means unlimited (backend semantics).
    #[serde(default)]
    pub limit: Option<i32>,
    /// Include a bucket counting documents with no value.
    #[serde(default)]
    pub missing: bool,
    #[serde(default)]
    pub range: Option<RangeFacet>,
}

impl FacetRequest {
    pub fn field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            limit: None,
            missing: false,
            range: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HighlightRequest {
    pub fields: Vec<String>,
    pub fragment_size: Option<u32>,
    pub snippets: Option<u32>,
}

/// Inbound search request. Treated as immutable once received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRequest {
    pub query: String,
    pub offset: u64,
    /// Page size; the deployment default applies when absent.
    pub limit: Option<u32>,
    /// Raw filter expressions, applied in order.
    pub filters: Vec<String>,
    pub sort: Option<SortSpec>,
    pub facets: Vec<FacetRequest>,
    pub strategy: SearchStrategy,
    /// Logical vector field names to use; empty means every configured field.
    pub vector_fields: Vec<String>,
    pub include_fields: Vec<String>,
    pub exclude_fields: Vec<String>,
    pub highlight: Option<HighlightRequest>,
}

impl SearchRequest {
    /// Creates a keyword request for `query`.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    pub fn filter(mut self, expr: impl Into<String>) -> Self {
        self.filters.push(expr.into());
        self
    }

    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn facet(mut self, facet: FacetRequest) -> Self {
        self.facets.push(facet);
        self
    }

    pub fn exclude(mut self, field: impl Into<String>) -> Self {
        self.exclude_fields.push(field.into());
        self
    }

    pub fn include(mut self, field: impl Into<String>) -> Self {
        self.include_fields.push(field.into());
        self
    }

    pub fn highlight(mut self, highlight: HighlightRequest) -> Self {
        self.highlight = Some(highlight);
        self
    }

    /// Returns `true` if the query text is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.query.trim().is_empty()
    }
}
