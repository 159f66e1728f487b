//! Base64 text transport for vectors.
//!
//! Callers that cannot send a literal numeric array pass the vector as the
//! standard base64 encoding (with padding) of its big-endian payload. This is
//! only used when a query is constructed, never while scoring.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{BinvecError, Result};
use crate::vector::codec::{self, ElementWidth};

/// Encode `values` at `width` as a base64 string.
pub fn to_text(values: &[f64], width: ElementWidth) -> String {
    STANDARD.encode(codec::encode(values, width))
}

/// Decode a base64 string produced by [`to_text`] at the same `width`.
pub fn from_text(text: &str, width: ElementWidth) -> Result<Vec<f64>> {
    let bytes = decode_bytes(text)?;
    if bytes.len() % width.bytes() != 0 {
        return Err(BinvecError::malformed(format!(
            "decoded {} bytes, not a multiple of the {}-byte element width",
            bytes.len(),
            width.bytes()
        )));
    }
    codec::decode(&bytes, 0, bytes.len(), bytes.len() / width.bytes(), width)
}

/// Decode base64 text into raw bytes.
pub fn decode_bytes(text: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(text.trim())
        .map_err(|e| BinvecError::malformed(format!("invalid base64 vector: {e}")))
}

/// Encode raw bytes as base64 text.
pub fn encode_bytes(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// [`to_text`] at the default 64-bit width.
pub fn encode_f64(values: &[f64]) -> String {
    to_text(values, ElementWidth::F64)
}

/// [`from_text`] at the default 64-bit width.
pub fn decode_f64(text: &str) -> Result<Vec<f64>> {
    from_text(text, ElementWidth::F64)
}
