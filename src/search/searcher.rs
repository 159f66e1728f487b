//! Parallel exhaustive scoring over segments.

use std::time::Instant;

use log::{debug, info};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{BinvecError, Result};
use crate::script::factory::VectorScoreFactory;
use crate::search::collector::{SearchResults, TopHitsCollector};
use crate::search::config::SearchConfig;
use crate::segment::traits::SegmentReader;

/// Scores every document of every segment against one compiled script.
///
/// Segments are fanned out over a rayon pool, one worker per segment. Workers
/// share only the factory's read-only query context.
pub struct VectorSearcher {
    config: SearchConfig,
    thread_pool: ThreadPool,
}

impl std::fmt::Debug for VectorSearcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorSearcher")
            .field("config", &self.config)
            .field("threads", &self.thread_pool.current_num_threads())
            .finish()
    }
}

impl VectorSearcher {
    /// Create a searcher with its own thread pool.
    pub fn new(config: SearchConfig) -> Result<Self> {
        let thread_pool_size = config.thread_pool_size.unwrap_or_else(num_cpus::get);

        let thread_pool = ThreadPoolBuilder::new()
            .num_threads(thread_pool_size)
            .thread_name(|i| format!("vector-search-{i}"))
            .build()
            .map_err(|e| BinvecError::internal(format!("Failed to create thread pool: {e}")))?;

        Ok(Self {
            config,
            thread_pool,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Score all documents of `segments` and return the top hits.
    ///
    /// The first per-document error aborts the whole search.
    pub fn search<S: SegmentReader>(
        &self,
        factory: &VectorScoreFactory,
        segments: &[S],
    ) -> Result<SearchResults> {
        let start = Instant::now();

        let collectors = self.thread_pool.install(|| {
            segments
                .par_iter()
                .enumerate()
                .map(|(ord, segment)| self.score_segment(factory, ord, segment))
                .collect::<Result<Vec<_>>>()
        })?;

        let mut merged = TopHitsCollector::new(self.config.max_results, self.config.min_score);
        for collector in collectors {
            merged.merge(collector);
        }

        let segment_ids: Vec<&str> = segments.iter().map(|s| s.id()).collect();
        let results = merged.into_results(&segment_ids);

        info!(
            "scored {} documents in {} segments on field {} in {:?}",
            results.total_hits,
            segments.len(),
            factory.field(),
            start.elapsed()
        );

        Ok(results)
    }

    /// Score the given candidate documents of one segment, in order.
    pub fn score_documents(
        &self,
        factory: &VectorScoreFactory,
        segment: &dyn SegmentReader,
        doc_ids: &[u64],
    ) -> Result<Vec<f64>> {
        let mut leaf = factory.for_segment(segment)?;
        doc_ids.iter().map(|&doc_id| leaf.score(doc_id)).collect()
    }

    fn score_segment(
        &self,
        factory: &VectorScoreFactory,
        ord: usize,
        segment: &dyn SegmentReader,
    ) -> Result<TopHitsCollector> {
        let mut leaf = factory.for_segment(segment)?;
        let mut collector = TopHitsCollector::new(self.config.max_results, self.config.min_score);

        for doc_id in 0..segment.max_doc() {
            let score = leaf.score(doc_id)?;
            collector.collect(ord, doc_id, score);
        }

        debug!(
            "segment {} scored {} documents",
            segment.id(),
            collector.total_hits()
        );
        Ok(collector)
    }
}
