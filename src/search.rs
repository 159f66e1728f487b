//! Exhaustive vector search over segments.
//!
//! This is a minimal host: it enumerates every document of every segment as a
//! candidate, scores it with a compiled script and keeps the best hits.

pub mod collector;
pub mod config;
pub mod searcher;

pub use self::collector::{SearchHit, SearchResults, TopHitsCollector};
pub use self::config::SearchConfig;
pub use self::searcher::VectorSearcher;
