//! The `binary_vector_score` script: parameter validation, the per-query
//! factory and the per-segment scorer.

pub mod engine;
pub mod factory;
pub mod params;

pub use self::engine::{ScriptContext, VectorScoringEngine};
pub use self::factory::{LeafVectorScorer, VectorScoreFactory};
pub use self::params::VectorScoreParams;
