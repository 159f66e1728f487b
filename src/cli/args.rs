//! Command line argument parsing for the binvec CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::MismatchPolicy;
use crate::vector::{CosineRange, DotProductTransform, ElementWidth};

/// binvec - packed vector encoding and similarity scoring
#[derive(Parser, Debug, Clone)]
#[command(name = "binvec")]
#[command(about = "Encode, decode and score packed binary vectors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct BinvecArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Configuration file (JSON)
    #[arg(short, long, env = "BINVEC_CONFIG", value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl BinvecArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Encode a vector as base64 text
    Encode(EncodeArgs),

    /// Decode base64 text back into a vector
    Decode(DecodeArgs),

    /// Score a JSONL document file against a query vector
    Score(ScoreArgs),
}

/// Arguments for encoding a vector
#[derive(Parser, Debug, Clone)]
pub struct EncodeArgs {
    /// Vector elements
    #[arg(value_name = "VALUES", required = true, num_args = 1.., allow_negative_numbers = true)]
    pub values: Vec<f64>,

    /// Element width
    #[arg(short, long)]
    pub width: Option<WidthArg>,

    /// Emit the full stored value (with length prefix) instead of the bare payload
    #[arg(long)]
    pub packed: bool,
}

/// Arguments for decoding a vector
#[derive(Parser, Debug, Clone)]
pub struct DecodeArgs {
    /// Base64 text
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Element width
    #[arg(short, long)]
    pub width: Option<WidthArg>,

    /// The text is a full stored value (with length prefix)
    #[arg(long)]
    pub packed: bool,
}

/// Arguments for scoring documents
#[derive(Parser, Debug, Clone)]
pub struct ScoreArgs {
    /// Document file (JSONL, one object per line)
    #[arg(value_name = "DOCUMENT_FILE")]
    pub document_file: PathBuf,

    /// Script parameters as JSON, or @path to read them from a file
    #[arg(short, long, value_name = "PARAMS")]
    pub params: String,

    /// Document field holding the document identifier
    #[arg(long, default_value = "id")]
    pub id_field: String,

    /// Number of segments to split the documents into
    #[arg(short, long, default_value = "1")]
    pub segments: usize,

    /// Maximum number of results to return
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Minimum score threshold for results
    #[arg(long)]
    pub min_score: Option<f64>,

    /// Number of worker threads
    #[arg(long)]
    pub threads: Option<usize>,

    /// Element width of stored and encoded vectors
    #[arg(short, long)]
    pub width: Option<WidthArg>,

    /// What to do with stored vectors that do not match the query
    #[arg(long)]
    pub on_mismatch: Option<MismatchArg>,

    /// Cosine output range
    #[arg(long)]
    pub cosine_range: Option<CosineRangeArg>,

    /// Dot product transform
    #[arg(long)]
    pub dot_transform: Option<DotTransformArg>,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

/// Element width values
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthArg {
    F32,
    F64,
}

impl From<WidthArg> for ElementWidth {
    fn from(arg: WidthArg) -> Self {
        match arg {
            WidthArg::F32 => ElementWidth::F32,
            WidthArg::F64 => ElementWidth::F64,
        }
    }
}

/// Mismatch policy values
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchArg {
    /// Abort the query
    Fail,
    /// Score the document 0
    Zero,
}

impl From<MismatchArg> for MismatchPolicy {
    fn from(arg: MismatchArg) -> Self {
        match arg {
            MismatchArg::Fail => MismatchPolicy::Fail,
            MismatchArg::Zero => MismatchPolicy::ScoreZero,
        }
    }
}

/// Cosine range values
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CosineRangeArg {
    /// [0, 1]
    Remapped,
    /// [-1, 1]
    Raw,
}

impl From<CosineRangeArg> for CosineRange {
    fn from(arg: CosineRangeArg) -> Self {
        match arg {
            CosineRangeArg::Remapped => CosineRange::Remapped,
            CosineRangeArg::Raw => CosineRange::Raw,
        }
    }
}

/// Dot product transform values
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotTransformArg {
    /// exp(dot)
    Exp,
    /// dot
    Raw,
}

impl From<DotTransformArg> for DotProductTransform {
    fn from(arg: DotTransformArg) -> Self {
        match arg {
            DotTransformArg::Exp => DotProductTransform::Exp,
            DotTransformArg::Raw => DotProductTransform::Raw,
        }
    }
}
