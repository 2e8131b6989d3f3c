use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use super::error::BackendError;
use super::model::{BackendResult, BackendRow, BackendValue, DocHighlights};

/// Decodes a Solr `wt=json` select response body.
///
/// `id_field` names the unique key of the collection; rows without it are rejected.
pub fn parse_select_response(body: Value, id_field: &str) -> Result<BackendResult, BackendError> {
    let Value::Object(mut body) = body else {
        return Err(BackendError::invalid("response body is not an object"));
    };

    let elapsed_ms = body
        .get("responseHeader")
        .and_then(|h| h.get("QTime"))
        .and_then(Value::as_u64)
        .unwrap_or(0);

    let Some(Value::Object(mut response)) = body.remove("response") else {
        return Err(BackendError::invalid("missing 'response' section"));
    };

    let num_found = response
        .get("numFound")
        .and_then(Value::as_u64)
        .ok_or_else(|| BackendError::invalid("missing 'response.numFound'"))?;

    let docs = match response.remove("docs") {
        Some(Value::Array(docs)) => docs,
        _ => return Err(BackendError::invalid("missing 'response.docs'")),
    };

    let rows = docs
        .into_iter()
        .map(|doc| parse_row(doc, id_field))
        .collect::<Result<Vec<_>, _>>()?;

    let highlighting = body.remove("highlighting").map(parse_highlighting);
    let facets = body.remove("facet_counts").map(parse_facets);

    Ok(BackendResult {
        rows,
        num_found,
        elapsed_ms,
        highlighting,
        facets,
    })
}

fn parse_row(doc: Value, id_field: &str) -> Result<BackendRow, BackendError> {
    let Value::Object(doc) = doc else {
        return Err(BackendError::invalid("result document is not an object"));
    };

    let id = match doc.get(id_field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => {
            return Err(BackendError::invalid(format!(
                "result document without '{}'",
                id_field
            )));
        }
    };

    let fields = doc
        .into_iter()
        .map(|(name, value)| (name, BackendValue::from_json(value)))
        .collect();

    Ok(BackendRow { id, fields })
}

fn parse_highlighting(value: Value) -> HashMap<String, DocHighlights> {
    let Value::Object(docs) = value else {
        return HashMap::new();
    };

    docs.into_iter()
        .map(|(id, fields)| {
            let fields = match fields {
                Value::Object(fields) => fields
                    .into_iter()
                    .map(|(field, fragments)| (field, fragment_list(fragments)))
                    .collect(),
                _ => Vec::new(),
            };
            (id, fields)
        })
        .collect()
}

fn fragment_list(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Value::String(s) => vec![s],
        _ => Vec::new(),
    }
}

/// Collects `facet_fields.<f>` and `facet_ranges.<f>.counts` into one map.
fn parse_facets(value: Value) -> BTreeMap<String, BackendValue> {
    let mut facets = BTreeMap::new();

    if let Some(Value::Object(fields)) = value.get("facet_fields") {
        for (field, counts) in fields {
            facets.insert(field.clone(), BackendValue::from_json(counts.clone()));
        }
    }

    if let Some(Value::Object(ranges)) = value.get("facet_ranges") {
        for (field, range) in ranges {
            if let Some(counts) = range.get("counts") {
                facets.insert(field.clone(), BackendValue::from_json(counts.clone()));
            }
        }
    }

    facets
}
