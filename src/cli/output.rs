//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{BinvecArgs, OutputFormat};
use crate::error::Result;

/// Result structure for vector encoding.
#[derive(Debug, Serialize, Deserialize)]
pub struct EncodeResult {
    pub width: String,
    pub dimension: usize,
    pub packed: bool,
    pub text: String,
}

/// Result structure for vector decoding.
#[derive(Debug, Serialize, Deserialize)]
pub struct DecodeResult {
    pub width: String,
    pub dimension: usize,
    pub values: Vec<f64>,
}

/// A ranked document in a score report.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScoredDocument {
    /// Value of the id field, or the line number when the document has none.
    pub id: serde_json::Value,
    pub segment: String,
    pub doc_id: u64,
    pub score: f64,
}

/// Result structure for scoring runs.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreReport {
    pub field: String,
    pub cosine: bool,
    pub documents: usize,
    pub segments: usize,
    pub total_hits: u64,
    pub max_score: f64,
    pub duration_ms: u64,
    pub hits: Vec<ScoredDocument>,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &BinvecArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &BinvecArgs) -> Result<()> {
    if args.verbosity() > 1 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;

    match result {
        _ if std::any::type_name::<T>().contains("ScoreReport") => output_score_report_human(&value),
        _ if std::any::type_name::<T>().contains("EncodeResult") => {
            if let Some(text) = value.get("text").and_then(|t| t.as_str()) {
                println!("{text}");
            }
            Ok(())
        }
        _ if std::any::type_name::<T>().contains("DecodeResult") => {
            if let Some(values) = value.get("values") {
                println!("{values}");
            }
            Ok(())
        }
        _ => output_generic_human(&value),
    }
}

/// Output score results in human format.
fn output_score_report_human(value: &serde_json::Value) -> Result<()> {
    let Some(obj) = value.as_object() else {
        return Ok(());
    };

    println!("Score Results:");
    println!("══════════════");

    if let Some(hits) = obj.get("hits").and_then(|h| h.as_array()) {
        for (i, hit) in hits.iter().enumerate() {
            println!(
                "{:>4}. {:<24} {:.7}  ({} #{})",
                i + 1,
                format_value(hit.get("id").unwrap_or(&serde_json::Value::Null)),
                hit.get("score").and_then(|s| s.as_f64()).unwrap_or(0.0),
                hit.get("segment").and_then(|s| s.as_str()).unwrap_or(""),
                hit.get("doc_id").and_then(|d| d.as_u64()).unwrap_or(0),
            );
        }
    }

    println!();
    if let Some(total) = obj.get("total_hits").and_then(|t| t.as_u64()) {
        println!("Documents scored: {total}");
    }
    if let Some(segments) = obj.get("segments").and_then(|s| s.as_u64()) {
        println!("Segments: {segments}");
    }
    if let Some(duration) = obj.get("duration_ms").and_then(|d| d.as_u64()) {
        println!("Search time: {duration}ms");
    }
    Ok(())
}

/// Generic human output.
fn output_generic_human(value: &serde_json::Value) -> Result<()> {
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                println!("{key}: {}", format_value(val));
            }
        }
        _ => println!("{}", format_value(value)),
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &BinvecArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}
