//! Typed script parameters.
//!
//! The host hands over a string-keyed parameter bag. It is deserialized into
//! [`VectorScoreParams`] and validated once, when the script is compiled for a
//! query, instead of being re-inspected on every document.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BinvecError, Result};
use crate::vector::codec::ElementWidth;
use crate::vector::context::QueryVectorContext;
use crate::vector::transport;

/// Parameter key naming the vector field.
pub const FIELD: &str = "field";
/// Parameter key selecting cosine mode.
pub const COSINE: &str = "cosine";
/// Parameter key for a literal query vector.
pub const VECTOR: &str = "vector";
/// Parameter key for a base64 query vector.
pub const ENCODED_VECTOR: &str = "encoded_vector";

/// Parameters of the vector scoring script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VectorScoreParams {
    /// Name of the per-document binary vector field. Required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Cosine mode when `true` (the default), exponentiated dot product otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cosine: Option<bool>,

    /// Literal query vector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f64>>,

    /// Base64 query vector, exclusive with `vector`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoded_vector: Option<String>,
}

impl VectorScoreParams {
    /// Start a parameter set for `field`.
    pub fn new<S: Into<String>>(field: S) -> Self {
        VectorScoreParams {
            field: Some(field.into()),
            ..Default::default()
        }
    }

    pub fn with_cosine(mut self, cosine: bool) -> Self {
        self.cosine = Some(cosine);
        self
    }

    pub fn with_vector(mut self, vector: Vec<f64>) -> Self {
        self.vector = Some(vector);
        self
    }

    pub fn with_encoded_vector<S: Into<String>>(mut self, encoded: S) -> Self {
        self.encoded_vector = Some(encoded.into());
        self
    }

    /// Read parameters from the host's JSON parameter bag.
    pub fn from_value(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(BinvecError::invalid_parameter(
                "script parameters must be a JSON object",
            ));
        }
        Self::deserialize(value).map_err(|e| BinvecError::invalid_parameter(e.to_string()))
    }

    /// Read parameters from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Whether cosine mode is selected, applying the default.
    pub fn is_cosine(&self) -> bool {
        self.cosine.unwrap_or(true)
    }

    /// Validate the parameters and build the query context.
    ///
    /// `width` is the element width a base64 `encoded_vector` is decoded at.
    /// Returns the field name together with the context.
    pub fn validate(&self, width: ElementWidth) -> Result<(String, QueryVectorContext)> {
        let field = match self.field.as_deref() {
            Some(field) if !field.is_empty() => field.to_string(),
            _ => {
                return Err(BinvecError::missing_parameter(
                    "binary_vector_score script requires a 'field' parameter",
                ));
            }
        };

        let vector = match (&self.vector, &self.encoded_vector) {
            (Some(_), Some(_)) => {
                return Err(BinvecError::invalid_parameter(format!(
                    "'{VECTOR}' and '{ENCODED_VECTOR}' are mutually exclusive"
                )));
            }
            (Some(vector), None) => vector.clone(),
            (None, Some(encoded)) => transport::from_text(encoded, width)?,
            (None, None) => {
                return Err(BinvecError::missing_parameter(format!(
                    "must have '{VECTOR}' or '{ENCODED_VECTOR}' as a parameter"
                )));
            }
        };

        if vector.is_empty() {
            return Err(BinvecError::invalid_parameter("query vector is empty"));
        }

        Ok((field, QueryVectorContext::new(vector, self.is_cosine())))
    }
}
