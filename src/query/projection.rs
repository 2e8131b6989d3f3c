use std::collections::HashSet;

use crate::config::DeploymentConfig;
use crate::model::SearchRequest;

/// Which stored fields a request returns.
///
/// The same exclusion set is applied twice: once to build `fl`, and again by the response mapper
/// on whatever the backend actually sent back.
#[derive(Debug, Clone)]
pub struct FieldProjection {
    id_field: String,
    include: Vec<String>,
    defaults: Vec<String>,
    excluded: HashSet<String>,
}

impl FieldProjection {
    pub fn for_request(deployment: &DeploymentConfig, request: &SearchRequest) -> Self {
        let excluded = deployment
            .excluded_fields
            .iter()
            .chain(deployment.vector_fields.iter().map(|f| &f.vector_field))
            .chain(request.exclude_fields.iter())
            .cloned()
            .collect();

        Self {
            id_field: deployment.id_field.clone(),
            include: request.include_fields.clone(),
            defaults: deployment.default_fields.clone(),
            excluded,
        }
    }

    /// Returns `true` if `field` must never appear in results.
    pub fn is_excluded(&self, field: &str) -> bool {
        self.excluded.contains(field)
    }

    /// Field names to request, id first, without duplicates.
    ///
    /// The id is always requested so rows can be keyed, even when it is excluded from results.
    ///
    /// An explicit include list wins over the defaults (unknown names are passed through).
    /// With neither, everything is requested (`*`).
    pub fn fields(&self) -> Vec<String> {
        let source = if self.include.is_empty() {
            &self.defaults
        } else {
            &self.include
        };

        let mut seen = HashSet::new();
        let mut fields = vec![self.id_field.clone()];
        seen.insert(self.id_field.as_str());

        if source.is_empty() {
            fields.push("*".to_string());
            return fields;
        }

        for field in source {
            if self.is_excluded(field) || !seen.insert(field.as_str()) {
                continue;
            }
            fields.push(field.clone());
        }
        fields
    }

    /// The `fl` parameter value.
    pub fn field_list(&self) -> String {
        self.fields().join(",")
    }
}
