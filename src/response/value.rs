use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::backend::BackendValue;

/// A result field value as sent to callers.
///
/// Serializes to plain JSON (`null`, booleans, numbers, strings, arrays, objects).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<FieldValue>),
    Struct(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

/// Total conversion. Values with no JSON counterpart (timestamps, NaN, infinities) become their
/// display string.
impl From<BackendValue> for FieldValue {
    fn from(value: BackendValue) -> Self {
        match value {
            BackendValue::Null => FieldValue::Null,
            BackendValue::Bool(b) => FieldValue::Bool(b),
            BackendValue::Int(i) => FieldValue::Number(i.into()),
            BackendValue::Float(f) => match serde_json::Number::from_f64(f) {
                Some(n) => FieldValue::Number(n),
                None => FieldValue::String(f.to_string()),
            },
            BackendValue::Text(s) => FieldValue::String(s),
            BackendValue::Timestamp { raw, .. } => FieldValue::String(raw),
            BackendValue::List(items) => {
                FieldValue::List(items.into_iter().map(FieldValue::from).collect())
            }
            BackendValue::Map(entries) => FieldValue::Struct(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, FieldValue::from(v)))
                    .collect(),
            ),
        }
    }
}
