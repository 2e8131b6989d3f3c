//! Backend result → caller response mapping.

mod facets;
mod mapper;
mod value;


pub use facets::FacetProcessor;
pub use mapper::ResponseMapper;
pub use value::FieldValue;
