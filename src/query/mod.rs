//! Request → backend query translation.
//!
//! [`QueryTranslator`] owns the deployment and emits a [`TranslatedQuery`]; vector similarity
//! clauses come from [`VectorQueryResolver`], one fragment shape per topology.

mod params;
mod projection;
mod translator;
mod vector;

#[cfg(test)]
mod tests;

pub use params::TranslatedQuery;
pub use projection::FieldProjection;
pub use translator::QueryTranslator;
pub use vector::{QueryFragment, VectorQueryResolver};
