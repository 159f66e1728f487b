//! Segment access capabilities.
//!
//! Scoring depends only on these two traits. An adapter implements them over
//! whatever per-segment storage the host engine actually has.

use crate::error::Result;

/// Per-document binary values of one field within one segment.
pub trait BinaryDocValues: Send + std::fmt::Debug {
    /// Position on `doc_id` and return its stored bytes, or `None` when the
    /// document has no value for the field.
    fn advance_exact(&mut self, doc_id: u64) -> Result<Option<&[u8]>>;
}

/// A partition of the document collection that is scored independently.
pub trait SegmentReader: Send + Sync + std::fmt::Debug {
    /// Identifier used in logs and hits.
    fn id(&self) -> &str;

    /// One past the largest document id in the segment.
    fn max_doc(&self) -> u64;

    /// Binary values of `field`, or `None` when no document in this segment
    /// has the field.
    fn binary_doc_values(&self, field: &str) -> Result<Option<Box<dyn BinaryDocValues + '_>>>;
}

// Allow shared segments to be searched directly.
impl<T: SegmentReader + ?Sized> SegmentReader for std::sync::Arc<T> {
    fn id(&self) -> &str {
        self.as_ref().id()
    }

    fn max_doc(&self) -> u64 {
        self.as_ref().max_doc()
    }

    fn binary_doc_values(&self, field: &str) -> Result<Option<Box<dyn BinaryDocValues + '_>>> {
        self.as_ref().binary_doc_values(field)
    }
}
