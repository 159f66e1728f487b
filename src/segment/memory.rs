//! In-memory segment implementation.
//!
//! Holds per-field binary values in document-id order. Used by the CLI and
//! tests in place of a host engine's on-disk segments.

use std::collections::HashMap;

use crate::error::Result;
use crate::segment::traits::{BinaryDocValues, SegmentReader};
use crate::vector::{ElementWidth, PackedVector};

/// An immutable segment whose values live in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySegment {
    id: String,
    max_doc: u64,
    fields: HashMap<String, Vec<Option<Vec<u8>>>>,
}

impl MemorySegment {
    /// Number of documents with a value for `field`.
    pub fn value_count(&self, field: &str) -> usize {
        self.fields
            .get(field)
            .map(|values| values.iter().filter(|v| v.is_some()).count())
            .unwrap_or(0)
    }

    /// Names of all fields with at least one value.
    pub fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.fields.keys().cloned().collect();
        names.sort();
        names
    }
}

impl SegmentReader for MemorySegment {
    fn id(&self) -> &str {
        &self.id
    }

    fn max_doc(&self) -> u64 {
        self.max_doc
    }

    fn binary_doc_values(&self, field: &str) -> Result<Option<Box<dyn BinaryDocValues + '_>>> {
        Ok(self.fields.get(field).map(|values| {
            Box::new(MemoryBinaryDocValues {
                values,
                current: None,
            }) as Box<dyn BinaryDocValues + '_>
        }))
    }
}

/// Binary values of one field of a [`MemorySegment`].
#[derive(Debug)]
pub struct MemoryBinaryDocValues<'a> {
    values: &'a [Option<Vec<u8>>],
    current: Option<u64>,
}

impl MemoryBinaryDocValues<'_> {
    /// Last document positioned on.
    pub fn current(&self) -> Option<u64> {
        self.current
    }
}

impl BinaryDocValues for MemoryBinaryDocValues<'_> {
    fn advance_exact(&mut self, doc_id: u64) -> Result<Option<&[u8]>> {
        self.current = Some(doc_id);
        Ok(usize::try_from(doc_id)
            .ok()
            .and_then(|idx| self.values.get(idx))
            .and_then(|value| value.as_deref()))
    }
}

/// Builder for [`MemorySegment`].
#[derive(Debug, Default)]
pub struct MemorySegmentBuilder {
    segment: MemorySegment,
}

impl MemorySegmentBuilder {
    /// Create a builder for a segment named `id`.
    pub fn new<S: Into<String>>(id: S) -> Self {
        MemorySegmentBuilder {
            segment: MemorySegment {
                id: id.into(),
                ..Default::default()
            },
        }
    }

    /// Append an empty document and return its id.
    pub fn add_document(&mut self) -> u64 {
        let doc_id = self.segment.max_doc;
        self.segment.max_doc += 1;
        doc_id
    }

    /// Store raw `bytes` as the value of `field` for `doc_id`.
    ///
    /// Documents are added on demand when `doc_id` is past the end.
    pub fn set_binary(&mut self, doc_id: u64, field: &str, bytes: Vec<u8>) -> &mut Self {
        if doc_id >= self.segment.max_doc {
            self.segment.max_doc = doc_id + 1;
        }
        let values = self.segment.fields.entry(field.to_string()).or_default();
        let idx = doc_id as usize;
        if values.len() <= idx {
            values.resize(idx + 1, None);
        }
        values[idx] = Some(bytes);
        self
    }

    /// Pack `vector` at `width` and store it as the value of `field`.
    pub fn set_vector(
        &mut self,
        doc_id: u64,
        field: &str,
        vector: &[f64],
        width: ElementWidth,
    ) -> Result<&mut Self> {
        let bytes = PackedVector::encode(vector, width)?;
        Ok(self.set_binary(doc_id, field, bytes))
    }

    /// Number of documents added so far.
    pub fn len(&self) -> u64 {
        self.segment.max_doc
    }

    pub fn is_empty(&self) -> bool {
        self.segment.max_doc == 0
    }

    pub fn build(self) -> MemorySegment {
        self.segment
    }
}
