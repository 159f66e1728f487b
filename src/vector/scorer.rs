//! Per-document similarity kernel.
//!
//! This runs once per candidate document, so it makes one pass over the
//! vectors and never allocates. Vectors whose sums leave the safe f64 range
//! take a second, rescaled pass.

use serde::{Deserialize, Serialize};

use crate::vector::context::QueryVectorContext;

/// Smallest squared norm the one-pass cosine trusts.
///
/// Below it, squared elements may have underflowed and the norm lost terms.
const MIN_SAFE_NORM_SQUARED: f64 = f64::MIN_POSITIVE / f64::EPSILON;

/// Output range of cosine scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CosineRange {
    /// `(1 + cos) / 2`, in `[0, 1]`. Hosts that reject negative scores need this.
    #[default]
    Remapped,
    /// Plain cosine similarity in `[-1, 1]`.
    Raw,
}

impl CosineRange {
    /// Get the name of this range.
    pub fn name(&self) -> &'static str {
        match self {
            CosineRange::Remapped => "remapped",
            CosineRange::Raw => "raw",
        }
    }
}

/// Transform applied to the dot product outside cosine mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DotProductTransform {
    /// `exp(dot)`: strictly positive and order preserving.
    #[default]
    Exp,
    /// The dot product itself; may be negative.
    Raw,
}

impl DotProductTransform {
    /// Get the name of this transform.
    pub fn name(&self) -> &'static str {
        match self {
            DotProductTransform::Exp => "exp",
            DotProductTransform::Raw => "raw",
        }
    }
}

/// Scores a decoded document vector against a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SimilarityScorer {
    pub cosine_range: CosineRange,
    pub dot_transform: DotProductTransform,
}

impl SimilarityScorer {
    pub fn new(cosine_range: CosineRange, dot_transform: DotProductTransform) -> Self {
        SimilarityScorer {
            cosine_range,
            dot_transform,
        }
    }

    /// Score `document` against the query held by `context`.
    ///
    /// `document` must already have the query's dimension; the decoder
    /// guarantees this. Cosine mode returns `0` when either vector is
    /// degenerate (all zero, or holding NaN or infinity). A NaN dot product
    /// scores `0` in dot mode.
    pub fn score(&self, context: &QueryVectorContext, document: &[f64]) -> f64 {
        let query = context.vector();
        debug_assert_eq!(query.len(), document.len());

        if !context.is_cosine() {
            let dot = dot_product(document, query);
            if dot.is_nan() {
                return 0.0;
            }
            return match self.dot_transform {
                DotProductTransform::Exp => dot.exp(),
                DotProductTransform::Raw => dot,
            };
        }

        let mut dot = 0.0;
        let mut doc_norm = 0.0;
        for (d, q) in document.iter().zip(query) {
            dot += d * q;
            doc_norm += d * d;
        }

        let Some(cosine) =
            cosine_from_sums(dot, doc_norm, context.magnitude(), document, query)
        else {
            return 0.0;
        };
        match self.cosine_range {
            CosineRange::Remapped => (1.0 + cosine) / 2.0,
            CosineRange::Raw => cosine,
        }
    }
}

/// Inner product of two equal-length slices.
#[inline]
pub fn dot_product(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Cosine similarity in `[-1, 1]`, or `0` when either vector is degenerate.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    cosine_from_sums(dot, norm_a, norm_b.sqrt(), a, b).unwrap_or(0.0)
}

/// Finish a cosine from one-pass sums, clamped to `[-1, 1]`.
///
/// Falls back to [`scaled_cosine`] when a sum overflowed or the norms are too
/// small to trust. `None` means a degenerate vector.
fn cosine_from_sums(
    dot: f64,
    norm_a_squared: f64,
    norm_b: f64,
    a: &[f64],
    b: &[f64],
) -> Option<f64> {
    let trusted = dot.is_finite()
        && is_safe_norm_squared(norm_a_squared)
        && is_safe_norm_squared(norm_b * norm_b);

    let cosine = if trusted {
        // |dot| <= |a| * |b|, so dividing one norm at a time cannot overflow.
        dot / norm_a_squared.sqrt() / norm_b
    } else {
        scaled_cosine(a, b)?
    };
    Some(cosine.clamp(-1.0, 1.0))
}

#[inline]
fn is_safe_norm_squared(norm_squared: f64) -> bool {
    (MIN_SAFE_NORM_SQUARED..=f64::MAX).contains(&norm_squared)
}

/// Cosine computed on both vectors divided by their largest element.
///
/// The scaled vectors have a largest element of exactly `1`, so their norms
/// are at least `1` and the sums stay finite.
fn scaled_cosine(a: &[f64], b: &[f64]) -> Option<f64> {
    let scale_a = max_abs(a)?;
    let scale_b = max_abs(b)?;

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (x / scale_a, y / scale_b);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    Some(dot / norm_a.sqrt() / norm_b.sqrt())
}

/// Largest absolute element, or `None` for a degenerate vector.
fn max_abs(values: &[f64]) -> Option<f64> {
    let mut max = 0.0_f64;
    for v in values {
        if !v.is_finite() {
            return None;
        }
        max = max.max(v.abs());
    }
    (max > 0.0).then_some(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-6;

    fn query() -> Vec<f64> {
        vec![0.1, 0.2, 0.3]
    }

    #[test]
    fn test_remapped_cosine_scores() {
        let context = QueryVectorContext::new(query(), true);
        let scorer = SimilarityScorer::default();

        let closer = scorer.score(&context, &[0.2, 0.6, 0.99]);
        let farther = scorer.score(&context, &[0.0, 0.5, 1.0]);

        assert!((closer - 0.9970867).abs() < EPSILON, "{closer}");
        assert!((farther - 0.9780914).abs() < EPSILON, "{farther}");
    }

    #[test]
    fn test_raw_cosine_scores() {
        let context = QueryVectorContext::new(query(), true);
        let scorer = SimilarityScorer::new(CosineRange::Raw, DotProductTransform::Exp);

        let closer = scorer.score(&context, &[0.2, 0.6, 0.99]);
        let farther = scorer.score(&context, &[0.0, 0.5, 1.0]);

        assert!((closer - 0.9941734).abs() < EPSILON, "{closer}");
        assert!((farther - 0.9561828).abs() < EPSILON, "{farther}");
    }

    #[test]
    fn test_exp_dot_product_scores() {
        let context = QueryVectorContext::new(query(), false);
        let scorer = SimilarityScorer::default();

        let closer = scorer.score(&context, &[0.2, 0.6, 0.99]);
        let farther = scorer.score(&context, &[0.0, 0.5, 1.0]);

        assert!((closer - 1.5480561).abs() < EPSILON, "{closer}");
        assert!((farther - 1.4918247).abs() < EPSILON, "{farther}");
    }

    #[test]
    fn test_raw_dot_product() {
        let context = QueryVectorContext::new(query(), false);
        let scorer = SimilarityScorer::new(CosineRange::Remapped, DotProductTransform::Raw);
        let score = scorer.score(&context, &[0.0, 0.5, 1.0]);
        assert!((score - 0.4).abs() < 1e-12);

        let negative = scorer.score(&context, &[-1.0, -1.0, -1.0]);
        assert!(negative < 0.0);
    }

    #[test]
    fn test_zero_document_scores_zero() {
        let scorer = SimilarityScorer::default();
        for q in [query(), vec![-5.0, 0.0, 2.0], vec![0.0, 0.0, 0.0]] {
            let context = QueryVectorContext::new(q, true);
            assert_eq!(scorer.score(&context, &[0.0, 0.0, 0.0]), 0.0);
        }
    }

    #[test]
    fn test_zero_query_scores_zero() {
        let context = QueryVectorContext::new(vec![0.0, 0.0], true);
        let scorer = SimilarityScorer::default();
        assert_eq!(scorer.score(&context, &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_opposite_vectors() {
        let context = QueryVectorContext::new(vec![1.0, 2.0], true);

        let remapped = SimilarityScorer::default().score(&context, &[-1.0, -2.0]);
        assert!(remapped.abs() < EPSILON);

        let raw = SimilarityScorer::new(CosineRange::Raw, DotProductTransform::Exp)
            .score(&context, &[-1.0, -2.0]);
        assert!((raw + 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_cosine_is_scale_invariant() {
        let context = QueryVectorContext::new(query(), true);
        let scorer = SimilarityScorer::default();
        let a = scorer.score(&context, &[0.2, 0.6, 0.99]);
        let b = scorer.score(&context, &[2.0, 6.0, 9.9]);
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_with_huge_elements() {
        let scorer = SimilarityScorer::new(CosineRange::Raw, DotProductTransform::Exp);
        let huge = QueryVectorContext::new(vec![1e200, 1e200], true);
        let unit = QueryVectorContext::new(vec![1.0, 1.0], true);

        for context in [&huge, &unit] {
            for doc in [[1e200, 1e200], [1e-200, 1e-200], [0.5, 0.5], [3e307, 3e307]] {
                let score = scorer.score(context, &doc);
                assert!((score - 1.0).abs() < 1e-12, "{doc:?}: {score}");
            }
            let opposite = scorer.score(context, &[-1e200, -1e200]);
            assert!((opposite + 1.0).abs() < 1e-12, "{opposite}");
        }

        let remapped = SimilarityScorer::default().score(&huge, &[1e200, 0.0]);
        assert!((remapped - (1.0 + 0.5_f64.sqrt()) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_with_tiny_elements() {
        let scorer = SimilarityScorer::new(CosineRange::Raw, DotProductTransform::Exp);
        let context = QueryVectorContext::new(vec![1e-200, 2e-200], true);

        let parallel = scorer.score(&context, &[3e-170, 6e-170]);
        assert!((parallel - 1.0).abs() < 1e-12, "{parallel}");

        let orthogonal = scorer.score(&context, &[-2e-310, 1e-310]);
        assert!(orthogonal.abs() < 1e-6, "{orthogonal}");
    }

    #[test]
    fn test_non_finite_elements_score_zero() {
        let scorer = SimilarityScorer::default();
        let cosine = QueryVectorContext::new(query(), true);
        assert_eq!(scorer.score(&cosine, &[f64::NAN, 0.6, 0.99]), 0.0);
        assert_eq!(scorer.score(&cosine, &[f64::INFINITY, 0.6, 0.99]), 0.0);

        let dot = QueryVectorContext::new(query(), false);
        assert_eq!(scorer.score(&dot, &[f64::NAN, 0.6, 0.99]), 0.0);
        let raw = SimilarityScorer::new(CosineRange::Remapped, DotProductTransform::Raw);
        assert_eq!(raw.score(&dot, &[f64::NAN, 0.6, 0.99]), 0.0);
    }

    #[test]
    fn test_helpers() {
        assert_eq!(dot_product(&[1.0, 2.0], &[3.0, 4.0]), 11.0);
        assert!((cosine_similarity(&[1.0, 0.0], &[0.0, 1.0])).abs() < EPSILON);
        assert!((cosine_similarity(&[1.0, 1.0], &[2.0, 2.0]) - 1.0).abs() < EPSILON);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[2.0, 2.0]), 0.0);
        assert!((cosine_similarity(&[1e200, 1e200], &[1.0, 1.0]) - 1.0).abs() < 1e-12);
        assert!((cosine_similarity(&[1e-200, 0.0], &[1e-200, 0.0]) - 1.0).abs() < 1e-12);
    }
}
