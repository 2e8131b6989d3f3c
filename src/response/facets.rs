use std::collections::BTreeMap;

use indexmap::IndexMap;
use tracing::warn;

use crate::backend::BackendValue;
use crate::model::{FacetCount, FacetRequest};

/// Normalizes backend facet counts into ordered `(value, count)` buckets.
///
/// Accepted shapes, all order-preserving:
/// - flat alternating list: `["book", 2, "article", 1]`
/// - list of pairs: `[["book", 2], ["article", 1]]` or `[{"val": "book", "count": 2}]`
/// - map: `{"book": 2, "article": 1}`
#[derive(Debug, Clone, Copy, Default)]
pub struct FacetProcessor;

impl FacetProcessor {
    /// One entry per requested field, in request order; fields the backend did not return
    /// map to an empty list.
    pub fn process(
        &self,
        requests: &[FacetRequest],
        raw: Option<&BTreeMap<String, BackendValue>>,
    ) -> IndexMap<String, Vec<FacetCount>> {
        requests
            .iter()
            .map(|request| {
                let buckets = raw
                    .and_then(|facets| facets.get(&request.field))
                    .map(|value| self.normalize(&request.field, value))
                    .unwrap_or_default();
                (request.field.clone(), buckets)
            })
            .collect()
    }

    /// Converts one field's raw counts. Malformed buckets are skipped with a warning.
    pub fn normalize(&self, field: &str, value: &BackendValue) -> Vec<FacetCount> {
        match value {
            BackendValue::List(items) if items.iter().all(is_scalar) => {
                let mut chunks = items.chunks_exact(2);
                let buckets = chunks
                    .by_ref()
                    .filter_map(|pair| bucket(field, &pair[0], &pair[1]))
                    .collect();
                if !chunks.remainder().is_empty() {
                    warn!(field, "Facet list has an odd number of entries, dropping the last");
                }
                buckets
            }
            BackendValue::List(items) => items
                .iter()
                .filter_map(|item| match item {
                    BackendValue::List(pair) if pair.len() == 2 => bucket(field, &pair[0], &pair[1]),
                    BackendValue::Map(entries) => {
                        let value = lookup(entries, "val").or_else(|| lookup(entries, "value"));
                        match (value, lookup(entries, "count")) {
                            (Some(value), Some(count)) => bucket(field, value, count),
                            _ => {
                                warn!(field, "Skipping facet bucket without value/count");
                                None
                            }
                        }
                    }
                    other => {
                        warn!(field, bucket = ?other, "Skipping malformed facet bucket");
                        None
                    }
                })
                .collect(),
            BackendValue::Map(entries) => entries
                .iter()
                .filter_map(|(value, count)| {
                    bucket(field, &BackendValue::Text(value.clone()), count)
                })
                .collect(),
            other => {
                warn!(field, counts = ?other, "Unrecognized facet counts shape");
                Vec::new()
            }
        }
    }
}

fn is_scalar(value: &BackendValue) -> bool {
    !matches!(value, BackendValue::List(_) | BackendValue::Map(_))
}

fn lookup<'a>(entries: &'a [(String, BackendValue)], key: &str) -> Option<&'a BackendValue> {
    entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

fn bucket(field: &str, value: &BackendValue, count: &BackendValue) -> Option<FacetCount> {
    let Some(count) = count.as_u64() else {
        warn!(field, count = ?count, "Skipping facet bucket with non-integer count");
        return None;
    };

    let value = match value {
        BackendValue::Null => return Some(FacetCount::missing(count)),
        BackendValue::Text(s) => s.clone(),
        BackendValue::Int(i) => i.to_string(),
        BackendValue::Float(f) => f.to_string(),
        BackendValue::Bool(b) => b.to_string(),
        BackendValue::Timestamp { raw, .. } => raw.clone(),
        BackendValue::List(_) | BackendValue::Map(_) => {
            warn!(field, "Skipping facet bucket with a structured value");
            return None;
        }
    };

    Some(FacetCount::new(value, count))
}
