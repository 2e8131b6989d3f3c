//! Test fixtures for integration tests.

use semgate::backend::{BackendResult, BackendRow, BackendValue};
use semgate::config::{DeploymentConfig, VectorFieldConfig, VectorTopology};

pub const TEST_COLLECTION: &str = "books";

pub const CHUNK_COLLECTION: &str = "book_chunks";

pub const TEST_DIM: usize = 8;

/// Books deployment with one inline and one chunk-collection vector field.
pub fn books_deployment() -> DeploymentConfig {
    DeploymentConfig::new(TEST_COLLECTION, &["title", "description"])
        .default_fields(&["id", "title", "description", "type", "category"])
        .excluded_fields(&["_version_"])
        .vector_field(VectorFieldConfig::inline("title", "title", "title_vector"))
        .vector_field(
            VectorFieldConfig::inline("chunks", "body", "chunk_vector").topology(
                VectorTopology::ChildCollection {
                    collection: CHUNK_COLLECTION.to_string(),
                    parent_id_field: "book_id".to_string(),
                },
            ),
        )
}

#[derive(Default)]
pub struct BackendResultBuilder {
    rows: Vec<BackendRow>,
    num_found: Option<u64>,
    elapsed_ms: u64,
}

impl BackendResultBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn book(mut self, id: &str, title: &str, description: &str) -> Self {
        self.rows.push(BackendRow {
            id: id.to_string(),
            fields: vec![
                ("id".to_string(), BackendValue::Text(id.to_string())),
                ("title".to_string(), BackendValue::Text(title.to_string())),
                (
                    "description".to_string(),
                    BackendValue::Text(description.to_string()),
                ),
                ("_version_".to_string(), BackendValue::Int(1)),
            ],
        });
        self
    }

    pub fn num_found(mut self, n: u64) -> Self {
        self.num_found = Some(n);
        self
    }

    pub fn elapsed_ms(mut self, ms: u64) -> Self {
        self.elapsed_ms = ms;
        self
    }

    pub fn build(self) -> BackendResult {
        BackendResult {
            num_found: self.num_found.unwrap_or(self.rows.len() as u64),
            rows: self.rows,
            elapsed_ms: self.elapsed_ms,
            ..Default::default()
        }
    }
}

pub fn machine_learning_books() -> BackendResult {
    BackendResultBuilder::new()
        .book("b1", "Machine Learning", "An introduction to machine learning")
        .book("b2", "Deep Learning", "Neural networks and machine learning")
        .elapsed_ms(5)
        .build()
}

/// A Solr `select` response body for the two books, with optional facets and highlighting.
pub fn solr_select_body() -> serde_json::Value {
    serde_json::json!({
        "responseHeader": { "status": 0, "QTime": 7 },
        "response": {
            "numFound": 2,
            "start": 0,
            "docs": [
                {
                    "id": "b1",
                    "title": "Machine Learning",
                    "type": "book",
                    "category": "education",
                    "published": "2019-03-01T00:00:00Z",
                    "_version_": 1790000000000000000u64
                },
                {
                    "id": "b2",
                    "title": "Deep Learning",
                    "type": "book",
                    "category": "education",
                    "published": "2021-06-15T00:00:00Z",
                    "_version_": 1790000000000000001u64
                }
            ]
        },
        "highlighting": {
            "b1": { "title": ["<em>Machine</em> Learning"] },
            "b2": {}
        },
        "facet_counts": {
            "facet_queries": {},
            "facet_fields": {
                "type": ["book", 2],
                "category": ["education", 2]
            },
            "facet_ranges": {}
        }
    })
}
