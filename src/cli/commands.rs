//! Command implementations for the binvec CLI.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use log::{debug, info};
use serde_json::Value;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::BinvecConfig;
use crate::error::{BinvecError, Result};
use crate::script::{ScriptContext, VectorScoringEngine};
use crate::search::VectorSearcher;
use crate::segment::{MemorySegment, MemorySegmentBuilder};
use crate::vector::{ElementWidth, PackedVector, transport};

/// Execute a CLI command.
pub fn execute_command(args: BinvecArgs) -> Result<()> {
    let config = load_config(&args)?;

    match &args.command {
        Command::Encode(encode_args) => encode_vector(encode_args.clone(), &config, &args),
        Command::Decode(decode_args) => decode_vector(decode_args.clone(), &config, &args),
        Command::Score(score_args) => score_documents(score_args.clone(), config, &args),
    }
}

/// Load the configuration file, or the defaults when none is given.
fn load_config(cli_args: &BinvecArgs) -> Result<BinvecConfig> {
    match &cli_args.config {
        Some(path) => {
            debug!("loading configuration from {}", path.display());
            BinvecConfig::from_file(path)
        }
        None => Ok(BinvecConfig::default()),
    }
}

fn effective_width(arg: Option<WidthArg>, config: &BinvecConfig) -> ElementWidth {
    arg.map(ElementWidth::from)
        .unwrap_or(config.scoring.element_width)
}

/// Encode a vector as base64 text.
fn encode_vector(args: EncodeArgs, config: &BinvecConfig, cli_args: &BinvecArgs) -> Result<()> {
    let width = effective_width(args.width, config);

    let text = if args.packed {
        transport::encode_bytes(&PackedVector::encode(&args.values, width)?)
    } else {
        transport::to_text(&args.values, width)
    };

    output_result(
        "Vector encoded",
        &EncodeResult {
            width: width.name().to_string(),
            dimension: args.values.len(),
            packed: args.packed,
            text,
        },
        cli_args,
    )
}

/// Decode base64 text into a vector.
fn decode_vector(args: DecodeArgs, config: &BinvecConfig, cli_args: &BinvecArgs) -> Result<()> {
    let width = effective_width(args.width, config);

    let values = if args.packed {
        let bytes = transport::decode_bytes(&args.text)?;
        PackedVector::parse(&bytes)?.to_vec(width)?
    } else {
        transport::from_text(&args.text, width)?
    };

    output_result(
        "Vector decoded",
        &DecodeResult {
            width: width.name().to_string(),
            dimension: values.len(),
            values,
        },
        cli_args,
    )
}

/// Score every document of a JSONL file against the query in `--params`.
fn score_documents(
    args: ScoreArgs,
    mut config: BinvecConfig,
    cli_args: &BinvecArgs,
) -> Result<()> {
    apply_score_overrides(&args, &mut config);

    if args.segments == 0 {
        return Err(BinvecError::invalid_parameter(
            "segment count must be at least 1",
        ));
    }

    let params = load_params(&args.params)?;
    let engine = VectorScoringEngine::new(config.scoring);
    let factory = engine.compile(
        VectorScoringEngine::SCRIPT_SOURCE,
        ScriptContext::Score,
        &params,
    )?;

    if cli_args.verbosity() > 1 {
        println!("Loading documents from: {}", args.document_file.display());
    }

    let corpus = load_documents(
        &args.document_file,
        factory.field(),
        &args.id_field,
        args.segments,
        config.scoring.element_width,
    )?;
    info!(
        "loaded {} documents into {} segments",
        corpus.documents,
        corpus.segments.len()
    );

    let start = Instant::now();
    let searcher = VectorSearcher::new(config.search.clone())?;
    let results = searcher.search(&factory, &corpus.segments)?;
    let duration = start.elapsed();

    let hits = results
        .hits
        .iter()
        .map(|hit| ScoredDocument {
            id: corpus.id_of(hit.segment_ord, hit.doc_id),
            segment: hit.segment.clone(),
            doc_id: hit.doc_id,
            score: hit.score,
        })
        .collect();

    output_result(
        "Documents scored",
        &ScoreReport {
            field: factory.field().to_string(),
            cosine: factory.context().is_cosine(),
            documents: corpus.documents,
            segments: corpus.segments.len(),
            total_hits: results.total_hits,
            max_score: results.max_score,
            duration_ms: duration.as_millis() as u64,
            hits,
        },
        cli_args,
    )
}

fn apply_score_overrides(args: &ScoreArgs, config: &mut BinvecConfig) {
    if let Some(width) = args.width {
        config.scoring.element_width = width.into();
    }
    if let Some(policy) = args.on_mismatch {
        config.scoring.mismatch_policy = policy.into();
    }
    if let Some(range) = args.cosine_range {
        config.scoring.cosine_range = range.into();
    }
    if let Some(transform) = args.dot_transform {
        config.scoring.dot_transform = transform.into();
    }
    if let Some(limit) = args.limit {
        config.search.max_results = limit;
    }
    if let Some(min_score) = args.min_score {
        config.search.min_score = Some(min_score);
    }
    if let Some(threads) = args.threads {
        config.search.thread_pool_size = Some(threads);
    }
}

/// Parse script parameters given inline or as `@path`.
fn load_params(source: &str) -> Result<Value> {
    let content = match source.strip_prefix('@') {
        Some(path) => fs::read_to_string(path)?,
        None => source.to_string(),
    };

    serde_json::from_str(&content)
        .map_err(|e| BinvecError::invalid_parameter(format!("params are not valid JSON: {e}")))
}

/// Documents of a JSONL file spread over in-memory segments.
#[derive(Debug)]
struct Corpus {
    segments: Vec<MemorySegment>,
    ids: Vec<Vec<Value>>,
    documents: usize,
}

impl Corpus {
    fn id_of(&self, segment_ord: usize, doc_id: u64) -> Value {
        self.ids
            .get(segment_ord)
            .and_then(|ids| ids.get(doc_id as usize))
            .cloned()
            .unwrap_or(Value::Null)
    }
}

/// Read a JSONL file and distribute its documents round-robin over
/// `segment_count` segments.
fn load_documents(
    path: &Path,
    field: &str,
    id_field: &str,
    segment_count: usize,
    width: ElementWidth,
) -> Result<Corpus> {
    let reader = BufReader::new(File::open(path)?);

    let mut builders: Vec<MemorySegmentBuilder> = (0..segment_count)
        .map(|i| MemorySegmentBuilder::new(format!("segment-{i}")))
        .collect();
    let mut ids: Vec<Vec<Value>> = vec![Vec::new(); segment_count];
    let mut documents = 0;

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let document: Value = serde_json::from_str(&line).map_err(|e| {
            BinvecError::invalid_parameter(format!("line {}: {e}", line_num + 1))
        })?;

        let ord = documents % segment_count;
        let builder = &mut builders[ord];
        let doc_id = builder.add_document();

        let stored = match document.get(field) {
            Some(value) => stored_value(value, width).map_err(|e| {
                BinvecError::invalid_parameter(format!("line {}: {e}", line_num + 1))
            })?,
            None => None,
        };
        if let Some(bytes) = stored {
            builder.set_binary(doc_id, field, bytes);
        }

        let id = document
            .get(id_field)
            .cloned()
            .unwrap_or_else(|| Value::from(line_num + 1));
        ids[ord].push(id);
        documents += 1;
    }

    Ok(Corpus {
        segments: builders.into_iter().map(MemorySegmentBuilder::build).collect(),
        ids,
        documents,
    })
}

/// Convert a JSON field value into the stored binary form.
///
/// Arrays are packed at `width`. Strings are base64 payloads and get framed
/// as they are, so their length is checked only at scoring time.
fn stored_value(value: &Value, width: ElementWidth) -> Result<Option<Vec<u8>>> {
    match value {
        Value::Null => Ok(None),
        Value::Array(items) => {
            let values = items
                .iter()
                .map(|item| {
                    item.as_f64().ok_or_else(|| {
                        BinvecError::invalid_parameter(format!("vector element {item} is not a number"))
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            Ok(Some(PackedVector::encode(&values, width)?))
        }
        Value::String(text) => {
            let payload = transport::decode_bytes(text)?;
            Ok(Some(PackedVector::frame(&payload)?))
        }
        other => Err(BinvecError::invalid_parameter(format!(
            "vector field must be an array or a base64 string, got {other}"
        ))),
    }
}
