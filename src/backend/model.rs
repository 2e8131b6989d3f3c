use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

/// A backend-native value after decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// A Solr date. `raw` is the text the backend sent, returned to callers unchanged.
    Timestamp { at: DateTime<Utc>, raw: String },
    /// Nested object, in backend order.
    Map(Vec<(String, BackendValue)>),
    List(Vec<BackendValue>),
}

impl BackendValue {
    /// Decodes a JSON value. Solr date strings (`2024-01-31T10:00:00Z`) become timestamps that
    /// keep their original text.
    pub fn from_json(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => BackendValue::Null,
            Value::Bool(b) => BackendValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => BackendValue::Int(i),
                None => BackendValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => match parse_solr_date(&s) {
                Some(at) => BackendValue::Timestamp { at, raw: s },
                None => BackendValue::Text(s),
            },
            Value::Array(items) => {
                BackendValue::List(items.into_iter().map(Self::from_json).collect())
            }
            Value::Object(map) => BackendValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            BackendValue::Int(i) if *i >= 0 => Some(*i as u64),
            _ => None,
        }
    }
}

fn parse_solr_date(s: &str) -> Option<DateTime<Utc>> {
    let bytes = s.as_bytes();
    let shaped = bytes.len() >= 20
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes[10] == b'T'
        && s.ends_with('Z');
    if !shaped {
        return None;
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// One result row.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendRow {
    pub id: String,
    /// Every returned field (id included), in backend order.
    pub fields: Vec<(String, BackendValue)>,
}

/// Highlight fragments for one document: `(field, fragments)` in backend order.
pub type DocHighlights = Vec<(String, Vec<String>)>;

/// Decoded select response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BackendResult {
    pub rows: Vec<BackendRow>,
    pub num_found: u64,
    /// Backend-reported query time (QTime).
    pub elapsed_ms: u64,
    /// Document id → highlighted fields.
    pub highlighting: Option<HashMap<String, DocHighlights>>,
    /// Facet field → raw counts, in whatever list shape the backend used.
    pub facets: Option<BTreeMap<String, BackendValue>>,
}
