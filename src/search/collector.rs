//! Top-k hit collection.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

/// A scored document in the final result list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Position of the segment in the searched slice.
    pub segment_ord: usize,
    /// Identifier of the segment.
    pub segment: String,
    /// The document ID within the segment.
    pub doc_id: u64,
    /// The vector score.
    pub score: f64,
}

/// Search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Hits ordered by descending score.
    pub hits: Vec<SearchHit>,
    /// Number of documents scored.
    pub total_hits: u64,
    /// Highest score among the hits, `0` when there are none.
    pub max_score: f64,
}

/// Heap entry. Greater means a better hit.
#[derive(Debug, Clone, Copy)]
struct ScoredDoc {
    score: f64,
    segment_ord: usize,
    doc_id: u64,
}

impl PartialEq for ScoredDoc {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoredDoc {}

impl PartialOrd for ScoredDoc {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredDoc {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher score wins; ties go to the earlier segment and document.
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.segment_ord.cmp(&self.segment_ord))
            .then_with(|| other.doc_id.cmp(&self.doc_id))
    }
}

/// Keeps the best `max_docs` hits seen.
///
/// Each segment worker fills its own collector; the searcher merges them.
#[derive(Debug, Clone)]
pub struct TopHitsCollector {
    max_docs: usize,
    min_score: Option<f64>,
    /// Min-heap: the worst kept hit is on top.
    hits: BinaryHeap<Reverse<ScoredDoc>>,
    total_hits: u64,
}

impl TopHitsCollector {
    pub fn new(max_docs: usize, min_score: Option<f64>) -> Self {
        TopHitsCollector {
            max_docs,
            min_score,
            hits: BinaryHeap::with_capacity(max_docs.min(1024)),
            total_hits: 0,
        }
    }

    /// Record one scored document.
    pub fn collect(&mut self, segment_ord: usize, doc_id: u64, score: f64) {
        self.total_hits += 1;
        self.offer(ScoredDoc {
            score,
            segment_ord,
            doc_id,
        });
    }

    fn offer(&mut self, doc: ScoredDoc) {
        // NaN has no rank; it counts as scored but is never a hit.
        if self.max_docs == 0 || doc.score.is_nan() {
            return;
        }
        if let Some(min_score) = self.min_score {
            if doc.score < min_score {
                return;
            }
        }

        if self.hits.len() < self.max_docs {
            self.hits.push(Reverse(doc));
        } else if let Some(Reverse(worst)) = self.hits.peek() {
            if doc > *worst {
                self.hits.pop();
                self.hits.push(Reverse(doc));
            }
        }
    }

    /// Fold another collector's hits into this one.
    pub fn merge(&mut self, other: TopHitsCollector) {
        self.total_hits += other.total_hits;
        for Reverse(doc) in other.hits {
            self.offer(doc);
        }
    }

    pub fn total_hits(&self) -> u64 {
        self.total_hits
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Finish collection. `segment_ids[ord]` names the segment of each hit.
    pub fn into_results<S: AsRef<str>>(self, segment_ids: &[S]) -> SearchResults {
        let mut docs: Vec<ScoredDoc> = self.hits.into_iter().map(|Reverse(doc)| doc).collect();
        docs.sort_by(|a, b| b.cmp(a));

        let hits: Vec<SearchHit> = docs
            .into_iter()
            .map(|doc| SearchHit {
                segment_ord: doc.segment_ord,
                segment: segment_ids
                    .get(doc.segment_ord)
                    .map(|id| id.as_ref().to_string())
                    .unwrap_or_default(),
                doc_id: doc.doc_id,
                score: doc.score,
            })
            .collect();

        SearchResults {
            max_score: hits.first().map(|hit| hit.score).unwrap_or(0.0),
            hits,
            total_hits: self.total_hits,
        }
    }
}
