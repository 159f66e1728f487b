//! Per-query factory and per-segment scorer.

use std::sync::Arc;

use log::{debug, warn};

use crate::config::{MismatchPolicy, ScoringOptions};
use crate::error::Result;
use crate::script::params::VectorScoreParams;
use crate::segment::binding::DocumentBinding;
use crate::segment::traits::SegmentReader;
use crate::vector::context::QueryVectorContext;
use crate::vector::packed::PackedVector;
use crate::vector::scorer::SimilarityScorer;

/// A compiled vector scoring script.
///
/// Created once per query. Hands out one [`LeafVectorScorer`] per segment,
/// all sharing the same read-only [`QueryVectorContext`].
#[derive(Debug, Clone)]
pub struct VectorScoreFactory {
    field: String,
    context: Arc<QueryVectorContext>,
    options: ScoringOptions,
}

impl VectorScoreFactory {
    /// Validate `params` and build the query context.
    pub fn new(params: &VectorScoreParams, options: ScoringOptions) -> Result<Self> {
        let (field, context) = params.validate(options.element_width)?;
        debug!(
            "compiled vector score script: field={field}, dimension={}, cosine={}, width={}",
            context.dimension(),
            context.is_cosine(),
            options.element_width.name()
        );
        if context.is_degenerate() {
            debug!("query vector is degenerate; every cosine score will be 0");
        }

        Ok(VectorScoreFactory {
            field,
            context: Arc::new(context),
            options,
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn context(&self) -> &Arc<QueryVectorContext> {
        &self.context
    }

    pub fn options(&self) -> &ScoringOptions {
        &self.options
    }

    /// The script never reads the host's own relevance score.
    pub fn needs_scores(&self) -> bool {
        false
    }

    /// Bind a scorer to `segment`.
    pub fn for_segment<'a>(&self, segment: &'a dyn SegmentReader) -> Result<LeafVectorScorer<'a>> {
        let binding = DocumentBinding::bound(segment, &self.field)?;
        Ok(LeafVectorScorer {
            context: Arc::clone(&self.context),
            options: self.options,
            scorer: self.options.scorer(),
            binding,
            scratch: vec![0.0; self.context.dimension()],
        })
    }
}

/// Scores the documents of one segment.
///
/// Owns its binding and decode buffer; never shared between workers.
#[derive(Debug)]
pub struct LeafVectorScorer<'a> {
    context: Arc<QueryVectorContext>,
    options: ScoringOptions,
    scorer: SimilarityScorer,
    binding: DocumentBinding<'a>,
    scratch: Vec<f64>,
}

impl LeafVectorScorer<'_> {
    /// Score `doc_id`.
    ///
    /// A document without a stored vector scores `0`. A stored value that does
    /// not decode to the query's dimension is an error unless the options ask
    /// for [`MismatchPolicy::ScoreZero`].
    pub fn score(&mut self, doc_id: u64) -> Result<f64> {
        let Some(bytes) = self.binding.seek(doc_id)? else {
            return Ok(0.0);
        };

        let decoded = PackedVector::parse(bytes)
            .and_then(|packed| packed.decode_into(self.options.element_width, &mut self.scratch));

        match decoded {
            Ok(()) => Ok(self.scorer.score(&self.context, &self.scratch)),
            Err(e)
                if e.is_document_error()
                    && self.options.mismatch_policy == MismatchPolicy::ScoreZero =>
            {
                warn!(
                    "segment {} doc {doc_id}: {e}; scoring 0",
                    self.binding.segment_id()
                );
                Ok(0.0)
            }
            Err(e) => Err(e),
        }
    }

    pub fn segment_id(&self) -> &str {
        self.binding.segment_id()
    }

    pub fn context(&self) -> &QueryVectorContext {
        &self.context
    }
}
