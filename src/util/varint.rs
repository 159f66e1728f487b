//! Variable-length integer encoding utilities.
//!
//! Values are written 7 bits per byte, least significant group first, with the
//! high bit of each byte set while more bytes follow. This is the encoding
//! the length prefixes of a packed vector use.

use std::io::{self, Read, Write};

use byteorder::ReadBytesExt;

use crate::error::{BinvecError, Result};

/// Maximum encoded length of a u32.
pub const MAX_U32_BYTES: usize = 5;

/// Maximum encoded length of a u64.
pub const MAX_U64_BYTES: usize = 10;

/// Encode a u32 value using variable-length encoding.
pub fn encode_u32(value: u32) -> Vec<u8> {
    encode_u64(value as u64)
}

/// Decode a u32 value from the start of `bytes`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode_u32(bytes: &[u8]) -> Result<(u32, usize)> {
    let (value, read) = decode_bounded(bytes, MAX_U32_BYTES)?;
    let value = u32::try_from(value)
        .map_err(|_| BinvecError::malformed(format!("varint {value} does not fit in u32")))?;
    Ok((value, read))
}

/// Encode a u64 value using variable-length encoding.
pub fn encode_u64(value: u64) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(MAX_U64_BYTES);
    let mut val = value;

    loop {
        let mut byte = (val & 0x7F) as u8;
        val >>= 7;

        if val != 0 {
            byte |= 0x80; // Set continuation bit
        }

        bytes.push(byte);

        if val == 0 {
            break;
        }
    }

    bytes
}

/// Decode a u64 value from the start of `bytes`.
pub fn decode_u64(bytes: &[u8]) -> Result<(u64, usize)> {
    decode_bounded(bytes, MAX_U64_BYTES)
}

fn decode_bounded(bytes: &[u8], max_bytes: usize) -> Result<(u64, usize)> {
    let mut result = 0u64;
    let mut shift = 0;

    for (i, &byte) in bytes.iter().enumerate() {
        if i >= max_bytes {
            return Err(BinvecError::malformed("varint overflow"));
        }

        result |= ((byte & 0x7F) as u64) << shift;

        if (byte & 0x80) == 0 {
            return Ok((result, i + 1));
        }

        shift += 7;
    }

    Err(BinvecError::malformed(format!(
        "incomplete varint: buffer ended after {} bytes",
        bytes.len()
    )))
}

/// Write a variable-length encoded u32 to a writer.
pub fn write_u32<W: Write>(writer: &mut W, value: u32) -> Result<usize> {
    let bytes = encode_u32(value);
    writer.write_all(&bytes)?;
    Ok(bytes.len())
}

/// Read a variable-length encoded u32 from a reader.
pub fn read_u32<R: Read>(reader: &mut R) -> Result<u32> {
    let mut result = 0u32;
    let mut shift = 0;

    for _ in 0..MAX_U32_BYTES {
        let byte = reader.read_u8().map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => BinvecError::malformed("incomplete varint"),
            _ => BinvecError::Io(e),
        })?;

        let group = (byte & 0x7F) as u32;
        if shift == 28 && group > 0x0F {
            return Err(BinvecError::malformed("varint does not fit in u32"));
        }
        result |= group << shift;

        if (byte & 0x80) == 0 {
            return Ok(result);
        }

        shift += 7;
    }

    Err(BinvecError::malformed("varint overflow"))
}

/// A forward-only varint cursor over a borrowed buffer.
///
/// A packed vector starts with two varints that must be read in order; the
/// reader keeps the position so the caller can locate the payload after them.
#[derive(Debug, Clone)]
pub struct VarIntReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> VarIntReader<'a> {
    /// Create a reader positioned at the start of `bytes`.
    pub fn new(bytes: &'a [u8]) -> Self {
        VarIntReader { bytes, position: 0 }
    }

    /// Read the next u32 and advance past it.
    pub fn read_u32(&mut self) -> Result<u32> {
        let (value, read) = decode_u32(&self.bytes[self.position..])?;
        self.position += read;
        Ok(value)
    }

    /// Current byte offset into the buffer.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }
}
