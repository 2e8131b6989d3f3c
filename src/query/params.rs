use std::collections::BTreeMap;

/// Backend parameters produced by the translator.
///
/// Every value is a string; a parameter may repeat (for example `fq`), and repeated values keep
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslatedQuery {
    params: BTreeMap<String, Vec<String>>,
    field_list: String,
}

impl TranslatedQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any existing values of `name`.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.insert(name.into(), vec![value.into()]);
    }

    /// Adds one more value for `name`.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.entry(name.into()).or_default().push(value.into());
    }

    /// First value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn get_all(&self, name: &str) -> &[String] {
        self.params.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.params
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Flattened `(name, value)` pairs, suitable for form encoding.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.params
            .iter()
            .flat_map(|(name, values)| values.iter().map(move |v| (name.as_str(), v.as_str())))
            .collect()
    }

    /// Resolved projection, comma separated (also set as `fl`).
    pub fn field_list(&self) -> &str {
        &self.field_list
    }

    pub(crate) fn set_field_list(&mut self, field_list: String) {
        self.set("fl", field_list.clone());
        self.field_list = field_list;
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
