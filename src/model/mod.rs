//! Inbound request and outbound response types (the RPC surface).

mod request;
mod response;


pub use request::{
    FacetRequest, HighlightRequest, RangeBound, RangeFacet, SearchRequest, SearchStrategy,
    SortDirection, SortSpec,
};
pub use response::{FacetCount, SearchResponse, SearchResult};
