//! Deployment definition: collection, searchable fields and vector field configs.
//!
//! Loaded once at startup from a JSON file. Example:
//!
//! ```json
//! {
//!   "collection": "books",
//!   "keywordFields": ["title", "description"],
//!   "defaultFields": ["id", "title", "description", "type", "category"],
//!   "excludedFields": ["_version_"],
//!   "vectorFields": [
//!     { "name": "title", "sourceField": "title", "vectorField": "title_vector",
//!       "topology": { "type": "inline" }, "topK": 10 },
//!     { "name": "chunks", "sourceField": "body", "vectorField": "chunk_vector",
//!       "topology": { "type": "childCollection", "collection": "book_chunks" } }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::constants::{DEFAULT_HYBRID_BOOST, DEFAULT_MAX_PAGE_SIZE, DEFAULT_PAGE_SIZE, DEFAULT_TOP_K};
use crate::model::SortSpec;

/// Parent selector used by [`VectorTopology::EmbeddedDoc`] when none is configured.
pub const DEFAULT_PARENT_FILTER: &str = "*:* -_nest_path_:*";

/// Join key used by [`VectorTopology::ChildCollection`] when none is configured.
pub const DEFAULT_PARENT_ID_FIELD: &str = "parent_id";

pub const DEFAULT_ID_FIELD: &str = "id";

/// Storage arrangement of a vector field relative to its parent document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum VectorTopology {
    /// Vector field lives on the primary document.
    Inline,
    /// Vector field lives on nested child documents of the primary document.
    EmbeddedDoc {
        #[serde(default = "default_parent_filter")]
        parent_filter: String,
    },
    /// Vectors live in a separate collection of chunks linked by a parent id field.
    ChildCollection {
        collection: String,
        #[serde(default = "default_parent_id_field")]
        parent_id_field: String,
    },
}

impl VectorTopology {
    pub fn as_str(&self) -> &'static str {
        match self {
            VectorTopology::Inline => "inline",
            VectorTopology::EmbeddedDoc { .. } => "embeddedDoc",
            VectorTopology::ChildCollection { .. } => "childCollection",
        }
    }
}

fn default_parent_filter() -> String {
    DEFAULT_PARENT_FILTER.to_string()
}

fn default_parent_id_field() -> String {
    DEFAULT_PARENT_ID_FIELD.to_string()
}

fn default_top_k() -> u32 {
    DEFAULT_TOP_K
}

fn default_id_field() -> String {
    DEFAULT_ID_FIELD.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_max_page_size() -> u32 {
    DEFAULT_MAX_PAGE_SIZE
}

fn default_hybrid_boost() -> f32 {
    DEFAULT_HYBRID_BOOST
}

/// Configuration of one semantically searchable field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorFieldConfig {
    /// Logical name used by requests (`vectorFields`).
    pub name: String,
    /// Text field the vectors were computed from.
    pub source_field: String,
    /// Backend field holding the vectors.
    pub vector_field: String,
    pub topology: VectorTopology,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    /// Embedding service endpoint for this field; the deployment default is used when absent.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl VectorFieldConfig {
    /// Creates an inline vector field with the default top-K.
    pub fn inline(name: &str, source_field: &str, vector_field: &str) -> Self {
        Self {
            name: name.to_string(),
            source_field: source_field.to_string(),
            vector_field: vector_field.to_string(),
            topology: VectorTopology::Inline,
            top_k: DEFAULT_TOP_K,
            endpoint: None,
        }
    }

    pub fn topology(mut self, topology: VectorTopology) -> Self {
        self.topology = topology;
        self
    }

    pub fn top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = Some(endpoint.to_string());
        self
    }
}

/// Everything the translator and mapper need to know about one deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfig {
    /// Primary collection queried by every request.
    pub collection: String,
    #[serde(default = "default_id_field")]
    pub id_field: String,
    /// Fields searched by the keyword clause (`qf`).
    pub keyword_fields: Vec<String>,
    /// Default projection; empty means all stored fields.
    #[serde(default)]
    pub default_fields: Vec<String>,
    /// Fields never returned to callers.
    #[serde(default)]
    pub excluded_fields: Vec<String>,
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
    #[serde(default)]
    pub default_sort: Option<SortSpec>,
    /// Weight of the secondary clause of hybrid queries, in `(0, 1)`.
    #[serde(default = "default_hybrid_boost")]
    pub hybrid_boost: f32,
    #[serde(default)]
    pub vector_fields: Vec<VectorFieldConfig>,
}

impl DeploymentConfig {
    /// Creates a deployment with defaults for everything but the collection and keyword fields.
    pub fn new(collection: &str, keyword_fields: &[&str]) -> Self {
        Self {
            collection: collection.to_string(),
            id_field: default_id_field(),
            keyword_fields: keyword_fields.iter().map(|f| f.to_string()).collect(),
            default_fields: Vec::new(),
            excluded_fields: Vec::new(),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            default_sort: None,
            hybrid_boost: DEFAULT_HYBRID_BOOST,
            vector_fields: Vec::new(),
        }
    }

    pub fn default_fields(mut self, fields: &[&str]) -> Self {
        self.default_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn excluded_fields(mut self, fields: &[&str]) -> Self {
        self.excluded_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn vector_field(mut self, field: VectorFieldConfig) -> Self {
        self.vector_fields.push(field);
        self
    }

    /// Reads, parses and validates a deployment file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::DeploymentIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Parses and validates a deployment definition.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|source| ConfigError::InvalidDeployment { source })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks deployment invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collection.trim().is_empty() {
            return Err(ConfigError::invalid("collection must not be empty"));
        }
        if self.keyword_fields.is_empty() {
            return Err(ConfigError::invalid("keywordFields must not be empty"));
        }
        if self.id_field.trim().is_empty() {
            return Err(ConfigError::invalid("idField must not be empty"));
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(ConfigError::invalid(format!(
                "defaultPageSize ({}) must be in 1..={}",
                self.default_page_size, self.max_page_size
            )));
        }
        if !(self.hybrid_boost > 0.0 && self.hybrid_boost < 1.0) {
            return Err(ConfigError::invalid(format!(
                "hybridBoost ({}) must be in (0, 1)",
                self.hybrid_boost
            )));
        }

        let mut names = HashSet::new();
        let mut targets = HashSet::new();
        for field in &self.vector_fields {
            if !names.insert(field.name.as_str()) {
                return Err(ConfigError::DuplicateVectorName {
                    name: field.name.clone(),
                });
            }
            if !targets.insert(field.vector_field.as_str()) {
                return Err(ConfigError::DuplicateVectorField {
                    field: field.vector_field.clone(),
                });
            }
            if field.top_k == 0 {
                return Err(ConfigError::invalid(format!(
                    "vector field '{}': topK must be > 0",
                    field.name
                )));
            }
            match &field.topology {
                VectorTopology::Inline => {}
                VectorTopology::EmbeddedDoc { parent_filter } => {
                    if parent_filter.contains('"') {
                        return Err(ConfigError::invalid(format!(
                            "vector field '{}': parentFilter must not contain '\"'",
                            field.name
                        )));
                    }
                }
                VectorTopology::ChildCollection {
                    collection,
                    parent_id_field,
                } => {
                    if collection.trim().is_empty() || parent_id_field.trim().is_empty() {
                        return Err(ConfigError::invalid(format!(
                            "vector field '{}': collection and parentIdField are required",
                            field.name
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Looks up a vector field by logical name.
    pub fn find_vector_field(&self, name: &str) -> Option<&VectorFieldConfig> {
        self.vector_fields.iter().find(|f| f.name == name)
    }
}
