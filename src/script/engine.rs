//! Script engine entry point.
//!
//! Hosts select the scorer by script language and source name, the way a
//! `script_score` clause names it:
//!
//! ```json
//! { "lang": "knn", "source": "binary_vector_score", "params": { ... } }
//! ```

use serde_json::Value;

use crate::config::ScoringOptions;
use crate::error::{BinvecError, Result};
use crate::script::factory::VectorScoreFactory;
use crate::script::params::VectorScoreParams;

/// Contexts a host may compile scripts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptContext {
    /// Document scoring.
    Score,
    /// Anything else (aggregations, field scripts, ingest).
    Other(&'static str),
}

impl ScriptContext {
    pub fn name(&self) -> &'static str {
        match self {
            ScriptContext::Score => "score",
            ScriptContext::Other(name) => name,
        }
    }
}

/// The vector scoring script engine.
#[derive(Debug, Clone, Default)]
pub struct VectorScoringEngine {
    options: ScoringOptions,
}

impl VectorScoringEngine {
    /// Script language name.
    pub const NAME: &'static str = "knn";

    /// The one script source the engine understands.
    pub const SCRIPT_SOURCE: &'static str = "binary_vector_score";

    pub fn new(options: ScoringOptions) -> Self {
        VectorScoringEngine { options }
    }

    pub fn lang(&self) -> &'static str {
        Self::NAME
    }

    pub fn options(&self) -> &ScoringOptions {
        &self.options
    }

    pub fn supported_contexts(&self) -> &'static [ScriptContext] {
        &[ScriptContext::Score]
    }

    /// Compile `source` for `context` with the host's parameter bag.
    pub fn compile(
        &self,
        source: &str,
        context: ScriptContext,
        params: &Value,
    ) -> Result<VectorScoreFactory> {
        if context != ScriptContext::Score {
            return Err(BinvecError::invalid_operation(format!(
                "{} scripts cannot be used for context [{}]",
                Self::NAME,
                context.name()
            )));
        }

        if source != Self::SCRIPT_SOURCE {
            return Err(BinvecError::query(format!("Unknown script name {source}")));
        }

        let params = VectorScoreParams::from_value(params)?;
        VectorScoreFactory::new(&params, self.options)
    }
}
