//! Search orchestration.

mod error;
mod search;


pub use error::{Dependency, ServiceError};
pub use search::SearchService;
