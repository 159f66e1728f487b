//! Configuration for the parallel vector searcher.

use serde::{Deserialize, Serialize};

/// Configuration for [`VectorSearcher`](crate::search::VectorSearcher).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Thread pool size for segment workers.
    /// If None, uses the number of CPU cores.
    pub thread_pool_size: Option<usize>,

    /// Maximum number of hits returned.
    pub max_results: usize,

    /// Hits scoring below this are counted but not returned.
    pub min_score: Option<f64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            thread_pool_size: None,
            max_results: 10,
            min_score: None,
        }
    }
}

impl SearchConfig {
    /// Create a new SearchConfig returning at most `max_results` hits.
    pub fn new(max_results: usize) -> Self {
        Self {
            max_results,
            ..Default::default()
        }
    }

    /// Set the thread pool size.
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }

    /// Set the minimum score threshold.
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = Some(min_score);
        self
    }
}
