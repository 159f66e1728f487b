//! Cursor from a document id to that document's stored vector bytes.

use log::debug;

use crate::error::{BinvecError, Result};
use crate::segment::traits::{BinaryDocValues, SegmentReader};

/// Position of a [`DocumentBinding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    /// Not attached to a segment yet.
    Unbound,
    /// Attached; holds the last document sought, if any.
    Bound(Option<u64>),
    /// The last seek was at or past the end of the segment.
    Exhausted,
}

/// Per-segment adapter that resolves candidate documents to raw packed bytes.
///
/// Owned by exactly one segment worker. A document without a value is
/// reported as `None`, which scorers treat as a zero score rather than an
/// error.
#[derive(Debug)]
pub struct DocumentBinding<'a> {
    state: BindingState,
    segment_id: &'a str,
    max_doc: u64,
    values: Option<Box<dyn BinaryDocValues + 'a>>,
}

impl Default for DocumentBinding<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> DocumentBinding<'a> {
    /// Create an unbound binding.
    pub fn new() -> Self {
        DocumentBinding {
            state: BindingState::Unbound,
            segment_id: "",
            max_doc: 0,
            values: None,
        }
    }

    /// Create a binding already attached to `field` of `segment`.
    pub fn bound(segment: &'a dyn SegmentReader, field: &str) -> Result<Self> {
        let mut binding = Self::new();
        binding.bind(segment, field)?;
        Ok(binding)
    }

    /// Attach to `field` of `segment`.
    ///
    /// Succeeds even when the segment has no values for the field; every seek
    /// then reports the document as absent.
    pub fn bind(&mut self, segment: &'a dyn SegmentReader, field: &str) -> Result<()> {
        if self.state != BindingState::Unbound {
            return Err(BinvecError::invalid_operation(format!(
                "binding is already attached to segment {}",
                self.segment_id
            )));
        }

        self.values = segment.binary_doc_values(field)?;
        if self.values.is_none() {
            debug!(
                "segment {} has no binary values for field {field}",
                segment.id()
            );
        }
        self.segment_id = segment.id();
        self.max_doc = segment.max_doc();
        self.state = BindingState::Bound(None);
        Ok(())
    }

    /// Move to `doc_id` and return its packed bytes, or `None` when absent.
    pub fn seek(&mut self, doc_id: u64) -> Result<Option<&[u8]>> {
        if self.state == BindingState::Unbound {
            return Err(BinvecError::invalid_operation(
                "seek called before the binding was attached to a segment",
            ));
        }

        if doc_id >= self.max_doc {
            self.state = BindingState::Exhausted;
            return Ok(None);
        }

        self.state = BindingState::Bound(Some(doc_id));
        match self.values.as_mut() {
            Some(values) => values.advance_exact(doc_id),
            None => Ok(None),
        }
    }

    pub fn state(&self) -> BindingState {
        self.state
    }

    /// Identifier of the attached segment, empty while unbound.
    pub fn segment_id(&self) -> &str {
        self.segment_id
    }

    /// Whether the attached segment has any values for the field.
    pub fn has_values(&self) -> bool {
        self.values.is_some()
    }
}
