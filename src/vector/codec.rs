//! Fixed-width big-endian element codec.
//!
//! The payload of a packed vector is a dense run of big-endian floats with no
//! header of its own. The length prefix belongs to the storage framing in
//! [`packed`](crate::vector::packed).

use byteorder::{BigEndian, ByteOrder};
use serde::{Deserialize, Serialize};

use crate::error::{BinvecError, Result};

/// Width of one stored element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ElementWidth {
    /// 32-bit IEEE 754 float, 4 bytes.
    F32,
    /// 64-bit IEEE 754 float, 8 bytes.
    #[default]
    F64,
}

impl ElementWidth {
    /// Number of bytes per element.
    pub const fn bytes(self) -> usize {
        match self {
            ElementWidth::F32 => 4,
            ElementWidth::F64 => 8,
        }
    }

    /// Get the name of this width.
    pub fn name(&self) -> &'static str {
        match self {
            ElementWidth::F32 => "f32",
            ElementWidth::F64 => "f64",
        }
    }

    /// Parse an element width from a string.
    pub fn parse_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "f32" | "float" => Ok(ElementWidth::F32),
            "f64" | "double" => Ok(ElementWidth::F64),
            _ => Err(BinvecError::invalid_parameter(format!(
                "Unknown element width: {s}"
            ))),
        }
    }
}

/// Encode `values` as `values.len() * width` big-endian bytes.
///
/// At [`ElementWidth::F32`] every value is narrowed with `as f32`.
pub fn encode(values: &[f64], width: ElementWidth) -> Vec<u8> {
    let mut bytes = vec![0u8; values.len() * width.bytes()];
    encode_into(values, width, &mut bytes);
    bytes
}

/// Encode `values` into `out`, which must hold exactly `values.len() * width` bytes.
pub fn encode_into(values: &[f64], width: ElementWidth, out: &mut [u8]) {
    debug_assert_eq!(out.len(), values.len() * width.bytes());
    match width {
        ElementWidth::F32 => {
            for (chunk, &value) in out.chunks_exact_mut(4).zip(values) {
                BigEndian::write_f32(chunk, value as f32);
            }
        }
        ElementWidth::F64 => BigEndian::write_f64_into(values, out),
    }
}

/// Decode `byte_length` bytes at `offset` into `out`.
///
/// `out.len()` is the expected element count. The call fails without touching
/// `out` when the region runs past the end of `buffer`
/// ([`BinvecError::MalformedEncoding`]) or when the region does not hold
/// exactly `out.len()` elements ([`BinvecError::DimensionMismatch`]).
pub fn decode_into(
    buffer: &[u8],
    offset: usize,
    byte_length: usize,
    width: ElementWidth,
    out: &mut [f64],
) -> Result<()> {
    let end = offset
        .checked_add(byte_length)
        .filter(|&end| end <= buffer.len())
        .ok_or_else(|| {
            BinvecError::malformed(format!(
                "payload of {byte_length} bytes at offset {offset} exceeds buffer of {} bytes",
                buffer.len()
            ))
        })?;

    if byte_length != out.len() * width.bytes() {
        return Err(BinvecError::dimension_mismatch(
            out.len(),
            byte_length,
            width.bytes(),
        ));
    }

    let payload = &buffer[offset..end];
    match width {
        ElementWidth::F32 => {
            for (slot, chunk) in out.iter_mut().zip(payload.chunks_exact(4)) {
                *slot = BigEndian::read_f32(chunk) as f64;
            }
        }
        ElementWidth::F64 => BigEndian::read_f64_into(payload, out),
    }

    Ok(())
}

/// Allocating form of [`decode_into`].
pub fn decode(
    buffer: &[u8],
    offset: usize,
    byte_length: usize,
    expected_count: usize,
    width: ElementWidth,
) -> Result<Vec<f64>> {
    let mut out = vec![0.0; expected_count];
    decode_into(buffer, offset, byte_length, width, &mut out)?;
    Ok(out)
}
