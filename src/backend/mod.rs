//! Search backend integration (Solr).

mod client;
mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod model;
mod parse;


pub use client::{SearchBackend, SolrClient};
pub use error::BackendError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockSearchBackend;
pub use model::{BackendResult, BackendRow, BackendValue, DocHighlights};
pub use parse::parse_select_response;
