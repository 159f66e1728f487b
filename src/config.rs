//! Configuration for scoring and search.
//!
//! Every behaviour that differed between historical variants of the scorer
//! (element width, what a bad stored value does, the output range) is an
//! explicit field here with a default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BinvecError, Result};
use crate::search::config::SearchConfig;
use crate::vector::codec::ElementWidth;
use crate::vector::scorer::{CosineRange, DotProductTransform, SimilarityScorer};

/// What happens when a stored value cannot be decoded against the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MismatchPolicy {
    /// Abort the query with the decoding error.
    #[default]
    Fail,
    /// Score the document `0` and log a warning. Results may then silently
    /// omit affected documents from the top ranks.
    ScoreZero,
}

impl MismatchPolicy {
    /// Get the name of this policy.
    pub fn name(&self) -> &'static str {
        match self {
            MismatchPolicy::Fail => "fail",
            MismatchPolicy::ScoreZero => "score_zero",
        }
    }

    /// Parse a policy from a string.
    pub fn parse_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fail" | "error" => Ok(MismatchPolicy::Fail),
            "score_zero" | "zero" => Ok(MismatchPolicy::ScoreZero),
            _ => Err(BinvecError::invalid_config(format!(
                "Unknown mismatch policy: {s}"
            ))),
        }
    }
}

/// Options fixed for the lifetime of a compiled script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScoringOptions {
    /// Width of stored and transport-encoded elements.
    pub element_width: ElementWidth,

    /// Handling of dimension mismatches and malformed stored values.
    pub mismatch_policy: MismatchPolicy,

    /// Output range in cosine mode.
    pub cosine_range: CosineRange,

    /// Transform applied to the dot product outside cosine mode.
    pub dot_transform: DotProductTransform,
}

impl ScoringOptions {
    pub fn with_element_width(mut self, width: ElementWidth) -> Self {
        self.element_width = width;
        self
    }

    pub fn with_mismatch_policy(mut self, policy: MismatchPolicy) -> Self {
        self.mismatch_policy = policy;
        self
    }

    pub fn with_cosine_range(mut self, range: CosineRange) -> Self {
        self.cosine_range = range;
        self
    }

    pub fn with_dot_transform(mut self, transform: DotProductTransform) -> Self {
        self.dot_transform = transform;
        self
    }

    /// The similarity kernel these options select.
    pub fn scorer(&self) -> SimilarityScorer {
        SimilarityScorer::new(self.cosine_range, self.dot_transform)
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinvecConfig {
    pub scoring: ScoringOptions,
    pub search: SearchConfig,
}

impl BinvecConfig {
    /// Load a configuration from a JSON file. Missing keys take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            BinvecError::invalid_config(format!("{}: {e}", path.display()))
        })
    }
}
