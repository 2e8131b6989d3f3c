//! Similarity fragments, one shape per vector topology.

use std::fmt::Write;

use crate::config::{VectorFieldConfig, VectorTopology};

/// A self-contained piece of backend query syntax for one similarity condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFragment(String);

impl QueryFragment {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for QueryFragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds similarity fragments for configured vector fields.
#[derive(Debug, Clone)]
pub struct VectorQueryResolver {
    id_field: String,
}

impl VectorQueryResolver {
    /// `id_field` is the primary collection's key, used as the join target for chunk collections.
    pub fn new(id_field: impl Into<String>) -> Self {
        Self {
            id_field: id_field.into(),
        }
    }

    pub fn build_fragment(&self, config: &VectorFieldConfig, vector: &[f32]) -> QueryFragment {
        let knn = knn_clause(&config.vector_field, config.top_k, vector);

        let fragment = match &config.topology {
            VectorTopology::Inline => knn,
            VectorTopology::EmbeddedDoc { parent_filter } => {
                format!("{{!parent which=\"{parent_filter}\" score=max v='{knn}'}}")
            }
            VectorTopology::ChildCollection {
                collection,
                parent_id_field,
            } => format!(
                "{{!join fromIndex={collection} from={parent_id_field} to={} score=max v='{knn}'}}",
                self.id_field
            ),
        };

        QueryFragment(fragment)
    }
}

/// `{!knn f=<field> topK=<k>}[v1,v2,...]`
fn knn_clause(field: &str, top_k: u32, vector: &[f32]) -> String {
    let mut out = format!("{{!knn f={field} topK={top_k}}}[");
    for (i, v) in vector.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{}", v);
    }
    out.push(']');
    out
}
