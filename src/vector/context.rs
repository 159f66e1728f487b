//! Per-query vector state.

/// Whether `values` has no usable direction.
///
/// True when every element is zero or any element is NaN or infinite. Cosine
/// scores against such a vector are `0`.
pub fn is_degenerate(values: &[f64]) -> bool {
    values.iter().all(|v| *v == 0.0) || values.iter().any(|v| !v.is_finite())
}

/// The query vector and everything derived from it once per query.
///
/// Built before any document is scored and shared read-only, usually behind
/// an `Arc`, by every segment worker of the query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryVectorContext {
    vector: Vec<f64>,
    cosine: bool,
    magnitude: f64,
    degenerate: bool,
}

impl QueryVectorContext {
    /// Create a context, computing the query magnitude when `cosine` is set.
    ///
    /// A degenerate vector is accepted here; every cosine score of the query
    /// is then zero. The magnitude may overflow or underflow for extreme
    /// elements, in which case the scorer rescales instead of using it.
    pub fn new(vector: Vec<f64>, cosine: bool) -> Self {
        let magnitude = if cosine {
            vector.iter().map(|v| v * v).sum::<f64>().sqrt()
        } else {
            0.0
        };
        let degenerate = is_degenerate(&vector);

        QueryVectorContext {
            vector,
            cosine,
            magnitude,
            degenerate,
        }
    }

    pub fn vector(&self) -> &[f64] {
        &self.vector
    }

    /// Number of elements every stored vector must have.
    pub fn dimension(&self) -> usize {
        self.vector.len()
    }

    pub fn is_cosine(&self) -> bool {
        self.cosine
    }

    /// `sqrt(Σ v²)` in cosine mode, `0` otherwise.
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    /// Whether cosine scoring of this query degrades to zero for every document.
    pub fn is_degenerate(&self) -> bool {
        self.cosine && self.degenerate
    }
}
