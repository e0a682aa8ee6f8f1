//! Searching Airweave: queries, the HTTP gateway and result normalization

pub mod gateway;
pub mod normalize;
pub mod query;
pub mod results;

pub use gateway::SearchGateway;
pub use query::{SearchMode, SearchQuery};
pub use results::{CanonicalResult, CollectionSummary, SearchResponse};
