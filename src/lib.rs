//! # binvec
//!
//! Exact per-document vector scoring for search engines.
//!
//! Each document stores one vector in a binary field, packed as
//! `[varint 1][varint byteLength][big-endian floats]`. A query supplies a
//! vector and every candidate document is scored by cosine similarity or by
//! an exponentiated dot product.
//!
//! ## Features
//!
//! - Allocation-free decoding of packed vectors into a reusable buffer
//! - Single-pass cosine and dot-product kernels
//! - Base64 transport for query vectors
//! - Typed, validated script parameters
//! - Parallel exhaustive search over segments
//!
//! ```
//! use binvec::config::ScoringOptions;
//! use binvec::script::{VectorScoreFactory, VectorScoreParams};
//! use binvec::segment::MemorySegmentBuilder;
//! use binvec::vector::ElementWidth;
//!
//! let mut builder = MemorySegmentBuilder::new("seg-0");
//! let doc = builder.add_document();
//! builder.set_vector(doc, "embedding", &[0.2, 0.6, 0.99], ElementWidth::F64).unwrap();
//! let segment = builder.build();
//!
//! let params = VectorScoreParams::new("embedding").with_vector(vec![0.1, 0.2, 0.3]);
//! let factory = VectorScoreFactory::new(&params, ScoringOptions::default()).unwrap();
//! let mut scorer = factory.for_segment(&segment).unwrap();
//! assert!((scorer.score(doc).unwrap() - 0.9970867).abs() < 1e-6);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod script;
pub mod search;
pub mod segment;
pub mod util;
pub mod vector;

pub mod prelude {
    pub use crate::config::{BinvecConfig, MismatchPolicy, ScoringOptions};
    pub use crate::error::{BinvecError, Result};
    pub use crate::script::{VectorScoreFactory, VectorScoreParams, VectorScoringEngine};
    pub use crate::search::{SearchConfig, VectorSearcher};
    pub use crate::segment::{MemorySegment, MemorySegmentBuilder, SegmentReader};
    pub use crate::vector::{ElementWidth, PackedVector, QueryVectorContext, SimilarityScorer};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
