//! Per-document packed vector framing.
//!
//! A stored value has the layout
//!
//! ```text
//! [varint count=1][varint byteLength][byteLength bytes: big-endian elements]
//! ```
//!
//! `count` is the number of binary values wrapped in the field, which is always
//! one vector. The two varints must be consumed in that order before the
//! payload can be located.

use crate::error::{BinvecError, Result};
use crate::util::varint::{self, VarIntReader};
use crate::vector::codec::{self, ElementWidth};

/// Number of values a packed vector wraps.
pub const PACKED_VALUE_COUNT: u32 = 1;

/// Indexing-side constructors for packed values.
pub struct PackedVector;

impl PackedVector {
    /// Encode `values` at `width` and wrap them in the storage framing.
    pub fn encode(values: &[f64], width: ElementWidth) -> Result<Vec<u8>> {
        Self::frame(&codec::encode(values, width))
    }

    /// Wrap an already encoded payload in the storage framing.
    ///
    /// Both prefixes are 32-bit varints, the width [`PackedVector::parse`]
    /// reads back. Payloads longer than `u32::MAX` bytes are rejected.
    pub fn frame(payload: &[u8]) -> Result<Vec<u8>> {
        let byte_length = u32::try_from(payload.len()).map_err(|_| {
            BinvecError::invalid_parameter(format!(
                "payload of {} bytes does not fit a 32-bit length prefix",
                payload.len()
            ))
        })?;

        let mut bytes = varint::encode_u32(PACKED_VALUE_COUNT);
        bytes.extend(varint::encode_u32(byte_length));
        bytes.extend_from_slice(payload);
        Ok(bytes)
    }

    /// Read the framing of a stored value.
    pub fn parse(bytes: &[u8]) -> Result<PackedVectorRef<'_>> {
        let mut reader = VarIntReader::new(bytes);
        let count = reader.read_u32()?;
        if count != PACKED_VALUE_COUNT {
            return Err(BinvecError::malformed(format!(
                "packed vector wraps {count} values, expected {PACKED_VALUE_COUNT}"
            )));
        }
        let byte_length = reader.read_u32()? as usize;
        let offset = reader.position();

        if byte_length > reader.remaining() {
            return Err(BinvecError::malformed(format!(
                "payload length {byte_length} exceeds the {} bytes after the header",
                reader.remaining()
            )));
        }

        Ok(PackedVectorRef {
            bytes,
            offset,
            byte_length,
        })
    }
}

/// A parsed view over a stored value.
#[derive(Debug, Clone, Copy)]
pub struct PackedVectorRef<'a> {
    bytes: &'a [u8],
    offset: usize,
    byte_length: usize,
}

impl<'a> PackedVectorRef<'a> {
    /// Offset of the payload within the stored value.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Payload length in bytes.
    pub fn byte_length(&self) -> usize {
        self.byte_length
    }

    /// The payload bytes.
    pub fn payload(&self) -> &'a [u8] {
        &self.bytes[self.offset..self.offset + self.byte_length]
    }

    /// Number of whole elements at `width`.
    pub fn element_count(&self, width: ElementWidth) -> usize {
        self.byte_length / width.bytes()
    }

    /// Decode the payload into `out`; see [`codec::decode_into`].
    pub fn decode_into(&self, width: ElementWidth, out: &mut [f64]) -> Result<()> {
        codec::decode_into(self.bytes, self.offset, self.byte_length, width, out)
    }

    /// Decode the payload, inferring the element count from its length.
    pub fn to_vec(&self, width: ElementWidth) -> Result<Vec<f64>> {
        if self.byte_length % width.bytes() != 0 {
            return Err(BinvecError::malformed(format!(
                "payload length {} is not a multiple of the {}-byte element width",
                self.byte_length,
                width.bytes()
            )));
        }
        codec::decode(
            self.bytes,
            self.offset,
            self.byte_length,
            self.element_count(width),
            width,
        )
    }
}
