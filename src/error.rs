//! Error types for the binvec library.
//!
//! All errors are represented by the [`BinvecError`] enum. The variants split
//! into three groups:
//!
//! - construction-time errors ([`BinvecError::MissingParameter`],
//!   [`BinvecError::InvalidParameter`]) which reject a query before any
//!   document is scored,
//! - per-document errors ([`BinvecError::DimensionMismatch`],
//!   [`BinvecError::MalformedEncoding`]) raised while decoding a stored value,
//! - ambient errors (I/O, JSON, invalid operations).
//!
//! # Examples
//!
//! ```
//! use binvec::error::{BinvecError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(BinvecError::missing_parameter("field"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use anyhow;
use thiserror::Error;

/// The main error type for binvec operations.
#[derive(Error, Debug)]
pub enum BinvecError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A required query parameter was not supplied.
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    /// A query parameter was supplied with the wrong type or an illegal value.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The stored vector does not have the query vector's dimension.
    #[error(
        "Dimension mismatch: expected {expected} elements ({} bytes at width {width}), found {actual_bytes} bytes",
        .expected * .width
    )]
    DimensionMismatch {
        /// Number of elements in the query vector.
        expected: usize,
        /// Payload length found in the stored value.
        actual_bytes: usize,
        /// Element width in bytes.
        width: usize,
    },

    /// A varint, a length prefix or a transport string is corrupt.
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    /// Query-related errors (unknown script, unsupported context, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with BinvecError.
pub type Result<T> = std::result::Result<T, BinvecError>;

impl BinvecError {
    /// Create a new missing parameter error.
    pub fn missing_parameter<S: Into<String>>(msg: S) -> Self {
        BinvecError::MissingParameter(msg.into())
    }

    /// Create a new invalid parameter error.
    pub fn invalid_parameter<S: Into<String>>(msg: S) -> Self {
        BinvecError::InvalidParameter(msg.into())
    }

    /// Create a new dimension mismatch error.
    pub fn dimension_mismatch(expected: usize, actual_bytes: usize, width: usize) -> Self {
        BinvecError::DimensionMismatch {
            expected,
            actual_bytes,
            width,
        }
    }

    /// Create a new malformed encoding error.
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        BinvecError::MalformedEncoding(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        BinvecError::Query(msg.into())
    }

    /// Create a new invalid operation error.
    pub fn invalid_operation<S: Into<String>>(msg: S) -> Self {
        BinvecError::InvalidOperation(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        BinvecError::Other(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        BinvecError::Other(format!("Invalid configuration: {}", msg.into()))
    }

    /// Create a new internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        BinvecError::Other(format!("Internal error: {}", msg.into()))
    }

    /// Whether this error was raised while decoding a single document's value.
    ///
    /// These are the errors a [`MismatchPolicy`](crate::config::MismatchPolicy)
    /// may downgrade to a zero score.
    pub fn is_document_error(&self) -> bool {
        matches!(
            self,
            BinvecError::DimensionMismatch { .. } | BinvecError::MalformedEncoding(_)
        )
    }
}
