//! Packed vector representation and similarity scoring.
//!
//! # Module Structure
//!
//! - `codec`: fixed-width big-endian element encoding
//! - `packed`: the varint-prefixed per-document value layout
//! - `transport`: base64 text form used for query vectors
//! - `context`: immutable per-query state
//! - `scorer`: the per-document similarity kernel

pub mod codec;
pub mod context;
pub mod packed;
pub mod scorer;
pub mod transport;

pub use self::codec::ElementWidth;
pub use self::context::QueryVectorContext;
pub use self::packed::{PackedVector, PackedVectorRef};
pub use self::scorer::{CosineRange, DotProductTransform, SimilarityScorer};
