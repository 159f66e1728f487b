use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

use binvec::config::{MismatchPolicy, ScoringOptions};
use binvec::error::{BinvecError, Result};
use binvec::script::{ScriptContext, VectorScoreFactory, VectorScoreParams, VectorScoringEngine};
use binvec::search::{SearchConfig, VectorSearcher};
use binvec::segment::{MemorySegment, MemorySegmentBuilder, SegmentReader};
use binvec::vector::{CosineRange, ElementWidth, PackedVector, transport};

const QUERY: [f64; 3] = [0.1, 0.2, 0.3];
const DOC_A: [f64; 3] = [0.2, 0.6, 0.99];
const DOC_B: [f64; 3] = [0.0, 0.5, 1.0];

fn random_vector(rng: &mut StdRng, len: usize) -> Vec<f64> {
    (0..len).map(|_| rng.random_range(-10.0..10.0)).collect()
}

fn segment_of(vectors: &[Option<Vec<f64>>], width: ElementWidth) -> MemorySegment {
    let mut builder = MemorySegmentBuilder::new("seg-0");
    for vector in vectors {
        let doc = builder.add_document();
        if let Some(vector) = vector {
            builder.set_vector(doc, "embedding", vector, width).unwrap();
        }
    }
    builder.build()
}

fn score_all(
    params: &VectorScoreParams,
    options: ScoringOptions,
    segment: &MemorySegment,
) -> Result<Vec<f64>> {
    let factory = VectorScoreFactory::new(params, options)?;
    let mut leaf = factory.for_segment(segment)?;
    (0..segment.max_doc()).map(|doc| leaf.score(doc)).collect()
}

#[test]
fn packed_values_round_trip_at_both_widths() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(42);

    for len in [1usize, 2, 3, 17, 128, 129, 300, 1023, 1024] {
        let values = random_vector(&mut rng, len);

        let packed = PackedVector::encode(&values, ElementWidth::F64)?;
        let decoded = PackedVector::parse(&packed)?.to_vec(ElementWidth::F64)?;
        assert_eq!(decoded, values);

        let packed = PackedVector::encode(&values, ElementWidth::F32)?;
        let decoded = PackedVector::parse(&packed)?.to_vec(ElementWidth::F32)?;
        for (d, v) in decoded.iter().zip(&values) {
            assert_eq!(*d, *v as f32 as f64);
        }

        let text = transport::to_text(&values, ElementWidth::F64);
        assert_eq!(transport::from_text(&text, ElementWidth::F64)?, values);
    }
    Ok(())
}

#[test]
fn cosine_scores_match_reference_values() -> Result<()> {
    let segment = segment_of(&[Some(DOC_A.to_vec()), Some(DOC_B.to_vec())], ElementWidth::F64);
    let params = VectorScoreParams::new("embedding").with_vector(QUERY.to_vec());

    let scores = score_all(&params, ScoringOptions::default(), &segment)?;
    assert!((scores[0] - 0.9970867).abs() < 1e-6);
    assert!((scores[1] - 0.9780914).abs() < 1e-6);
    assert!(scores[0] > scores[1]);
    Ok(())
}

#[test]
fn dot_product_scores_match_reference_values() -> Result<()> {
    let segment = segment_of(&[Some(DOC_A.to_vec()), Some(DOC_B.to_vec())], ElementWidth::F64);
    let params = VectorScoreParams::new("embedding")
        .with_vector(QUERY.to_vec())
        .with_cosine(false);

    let scores = score_all(&params, ScoringOptions::default(), &segment)?;
    assert!((scores[0] - 1.5480561).abs() < 1e-6);
    assert!((scores[1] - 1.4918247).abs() < 1e-6);
    Ok(())
}

#[test]
fn encoded_query_scores_like_plain_query() -> Result<()> {
    let segment = segment_of(&[Some(DOC_A.to_vec())], ElementWidth::F64);
    let plain = VectorScoreParams::new("embedding").with_vector(QUERY.to_vec());
    let encoded = VectorScoreParams::new("embedding")
        .with_encoded_vector(transport::to_text(&QUERY, ElementWidth::F64));

    let a = score_all(&plain, ScoringOptions::default(), &segment)?;
    let b = score_all(&encoded, ScoringOptions::default(), &segment)?;
    assert_eq!(a, b);
    Ok(())
}

#[test]
fn random_cosine_scores_stay_in_unit_range() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(7);
    let dimension = 16;

    let docs: Vec<Option<Vec<f64>>> = (0..200)
        .map(|_| Some(random_vector(&mut rng, dimension)))
        .collect();
    let segment = segment_of(&docs, ElementWidth::F64);

    for _ in 0..10 {
        let params =
            VectorScoreParams::new("embedding").with_vector(random_vector(&mut rng, dimension));
        for score in score_all(&params, ScoringOptions::default(), &segment)? {
            assert!((0.0..=1.0).contains(&score), "score {score} out of range");
        }
    }
    Ok(())
}

#[test]
fn random_raw_cosine_scores_stay_in_signed_unit_range() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(11);
    let dimension = 16;

    let docs: Vec<Option<Vec<f64>>> = (0..200)
        .map(|_| Some(random_vector(&mut rng, dimension)))
        .collect();
    let segment = segment_of(&docs, ElementWidth::F64);
    let raw = ScoringOptions::default().with_cosine_range(CosineRange::Raw);

    let mut saw_negative = false;
    for _ in 0..10 {
        let params =
            VectorScoreParams::new("embedding").with_vector(random_vector(&mut rng, dimension));
        for score in score_all(&params, raw, &segment)? {
            assert!((-1.0..=1.0).contains(&score), "score {score} out of range");
            saw_negative |= score < 0.0;
        }
    }
    assert!(saw_negative);
    Ok(())
}

#[test]
fn cosine_scores_stay_bounded_for_extreme_magnitudes() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(13);
    let dimension = 8;

    let mut docs = Vec::new();
    for exponent in [-300, -200, -100, 0, 100, 200, 300] {
        let scale = 10f64.powi(exponent);
        for _ in 0..10 {
            let doc: Vec<f64> = random_vector(&mut rng, dimension)
                .into_iter()
                .map(|v| v * scale)
                .collect();
            docs.push(Some(doc));
        }
    }
    let segment = segment_of(&docs, ElementWidth::F64);

    for exponent in [-200, 0, 200] {
        let scale = 10f64.powi(exponent);
        let query: Vec<f64> = random_vector(&mut rng, dimension)
            .into_iter()
            .map(|v| v * scale)
            .collect();
        let params = VectorScoreParams::new("embedding").with_vector(query);
        for score in score_all(&params, ScoringOptions::default(), &segment)? {
            assert!((0.0..=1.0).contains(&score), "score {score} out of range");
        }
    }

    // A document parallel to the query scores 1 whatever the magnitudes.
    let segment = segment_of(
        &[Some(vec![1e200, 1e200]), Some(vec![1e-200, 1e-200]), Some(vec![0.5, 0.5])],
        ElementWidth::F64,
    );
    for query in [vec![1e200, 1e200], vec![1.0, 1.0]] {
        let params = VectorScoreParams::new("embedding").with_vector(query);
        for score in score_all(&params, ScoringOptions::default(), &segment)? {
            assert!((score - 1.0).abs() < 1e-12, "score {score}");
        }
    }
    Ok(())
}

#[test]
fn zero_vectors_score_zero_under_cosine() -> Result<()> {
    let segment = segment_of(&[Some(vec![0.0; 3]), Some(DOC_A.to_vec())], ElementWidth::F64);

    let params = VectorScoreParams::new("embedding").with_vector(QUERY.to_vec());
    let scores = score_all(&params, ScoringOptions::default(), &segment)?;
    assert_eq!(scores[0], 0.0);

    let zero_query = VectorScoreParams::new("embedding").with_vector(vec![0.0; 3]);
    let scores = score_all(&zero_query, ScoringOptions::default(), &segment)?;
    assert_eq!(scores, vec![0.0, 0.0]);
    Ok(())
}

#[test]
fn dot_product_scores_follow_dot_product_order() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(99);
    let dimension = 8;
    let query: Vec<f64> = (0..dimension).map(|_| rng.random_range(-0.5..0.5)).collect();
    let docs: Vec<Vec<f64>> = (0..50)
        .map(|_| (0..dimension).map(|_| rng.random_range(-0.5..0.5)).collect())
        .collect();

    let segment = segment_of(
        &docs.iter().cloned().map(Some).collect::<Vec<_>>(),
        ElementWidth::F64,
    );
    let params = VectorScoreParams::new("embedding")
        .with_vector(query.clone())
        .with_cosine(false);
    let scores = score_all(&params, ScoringOptions::default(), &segment)?;

    let dots: Vec<f64> = docs
        .iter()
        .map(|doc| doc.iter().zip(&query).map(|(a, b)| a * b).sum())
        .collect();

    for i in 0..docs.len() {
        assert!(scores[i] > 0.0);
        for j in 0..docs.len() {
            if dots[i] > dots[j] + 1e-12 {
                assert!(scores[i] > scores[j]);
            }
        }
    }
    Ok(())
}

#[test]
fn moving_a_document_toward_the_query_raises_its_dot_score() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(23);
    let dimension = 8;

    for _ in 0..20 {
        let query: Vec<f64> = (0..dimension).map(|_| rng.random_range(-1.0..1.0)).collect();
        let doc: Vec<f64> = (0..dimension).map(|_| rng.random_range(-1.0..1.0)).collect();
        let k: f64 = rng.random_range(0.01..2.0);
        let moved: Vec<f64> = doc.iter().zip(&query).map(|(d, q)| d + k * q).collect();

        let segment = segment_of(&[Some(doc), Some(moved)], ElementWidth::F64);
        let params = VectorScoreParams::new("embedding")
            .with_vector(query)
            .with_cosine(false);
        let scores = score_all(&params, ScoringOptions::default(), &segment)?;
        assert!(scores[1] > scores[0], "{} <= {}", scores[1], scores[0]);
    }
    Ok(())
}

#[test]
fn documents_without_values_score_zero() -> Result<()> {
    let segment = segment_of(&[None, Some(DOC_A.to_vec()), None], ElementWidth::F64);
    let params = VectorScoreParams::new("embedding").with_vector(QUERY.to_vec());

    let scores = score_all(&params, ScoringOptions::default(), &segment)?;
    assert_eq!(scores[0], 0.0);
    assert!(scores[1] > 0.9);
    assert_eq!(scores[2], 0.0);

    let other_field = VectorScoreParams::new("missing").with_vector(QUERY.to_vec());
    let scores = score_all(&other_field, ScoringOptions::default(), &segment)?;
    assert_eq!(scores, vec![0.0, 0.0, 0.0]);
    Ok(())
}

#[test]
fn dimension_mismatch_fails_unless_opted_out() -> Result<()> {
    let segment = segment_of(&[Some(vec![1.0, 2.0]), Some(DOC_A.to_vec())], ElementWidth::F64);
    let params = VectorScoreParams::new("embedding").with_vector(QUERY.to_vec());

    let err = score_all(&params, ScoringOptions::default(), &segment).unwrap_err();
    assert!(matches!(
        err,
        BinvecError::DimensionMismatch {
            expected: 3,
            actual_bytes: 16,
            width: 8
        }
    ));

    let lenient = ScoringOptions::default().with_mismatch_policy(MismatchPolicy::ScoreZero);
    let scores = score_all(&params, lenient, &segment)?;
    assert_eq!(scores[0], 0.0);
    assert!((scores[1] - 0.9970867).abs() < 1e-6);
    Ok(())
}

#[test]
fn engine_compiles_and_searches_segments() -> Result<()> {
    let segments = vec![
        segment_of(&[Some(DOC_B.to_vec()), None], ElementWidth::F32),
        segment_of(&[Some(DOC_A.to_vec())], ElementWidth::F32),
    ];

    let options = ScoringOptions::default().with_element_width(ElementWidth::F32);
    let engine = VectorScoringEngine::new(options);
    let factory = engine.compile(
        VectorScoringEngine::SCRIPT_SOURCE,
        ScriptContext::Score,
        &json!({"field": "embedding", "vector": QUERY}),
    )?;

    let searcher = VectorSearcher::new(SearchConfig::new(2).with_thread_pool_size(2))?;
    let results = searcher.search(&factory, &segments)?;

    assert_eq!(results.total_hits, 3);
    assert_eq!(results.hits.len(), 2);
    assert_eq!(results.hits[0].segment_ord, 1);
    assert!((results.hits[0].score - 0.9970867).abs() < 1e-5);
    assert_eq!(results.hits[1].segment_ord, 0);
    assert!((results.hits[1].score - 0.9780914).abs() < 1e-5);
    Ok(())
}

#[test]
fn engine_rejects_bad_requests() {
    let engine = VectorScoringEngine::new(ScoringOptions::default());

    let unknown = engine.compile(
        "other",
        ScriptContext::Score,
        &json!({"field": "v", "vector": [1.0]}),
    );
    assert!(matches!(unknown, Err(BinvecError::Query(_))));

    let no_field = engine.compile(
        VectorScoringEngine::SCRIPT_SOURCE,
        ScriptContext::Score,
        &json!({"vector": [1.0]}),
    );
    assert!(matches!(no_field, Err(BinvecError::MissingParameter(_))));

    let no_vector = engine.compile(
        VectorScoringEngine::SCRIPT_SOURCE,
        ScriptContext::Score,
        &json!({"field": "v"}),
    );
    assert!(matches!(no_vector, Err(BinvecError::MissingParameter(_))));
}
