//! Feature preprocessing: turn a `FeatureFrame` into the numeric matrix a
//! model expects.
//!
//! The shipped implementation is `ColumnEncoder`, a fitted column-wise encoder
//! read from a JSON artifact. Each configured column is either passed through,
//! standardized with a stored mean/std, or one-hot encoded against a stored
//! category list. Output columns follow the configured column order.

use std::collections::HashSet;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::PredictionError;
use crate::frame::{FeatureFrame, FeatureValue};

/// Anything that can encode raw features for a model.
pub trait Preprocessor {
    /// Encode every row of `frame`. The result has `frame.nrows()` rows.
    fn transform(&self, frame: &FeatureFrame) -> Result<Array2<f32>, PredictionError>;

    /// Width of the encoded matrix, when known up front.
    fn output_width(&self) -> Option<usize> {
        None
    }
}

/// What to do with a category that was not seen when the encoder was fitted.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    /// Fail the transform.
    #[default]
    Error,
    /// Emit an all-zero one-hot block.
    Ignore,
}

/// Per-column encoding.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ColumnTransform {
    Passthrough,
    StandardScale {
        mean: f64,
        std: f64,
    },
    OneHot {
        categories: Vec<String>,
        #[serde(default)]
        handle_unknown: HandleUnknown,
    },
}

impl ColumnTransform {
    /// Minimum stddev to avoid division by zero when transforming.
    const MIN_STD: f64 = 1e-6;

    fn width(&self) -> usize {
        match self {
            ColumnTransform::OneHot { categories, .. } => categories.len(),
            _ => 1,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct EncodedColumn {
    pub name: String,
    pub transform: ColumnTransform,
}

/// Fitted column-wise encoder.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ColumnEncoder {
    pub columns: Vec<EncodedColumn>,
}

impl ColumnEncoder {
    /// Parse and sanity check an encoder artifact.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, String> {
        let encoder: ColumnEncoder =
            serde_json::from_slice(bytes).map_err(|e| format!("invalid encoder JSON: {}", e))?;
        encoder.validate()?;
        Ok(encoder)
    }

    fn validate(&self) -> Result<(), String> {
        if self.columns.is_empty() {
            return Err("encoder has no columns".to_string());
        }
        let mut seen = HashSet::new();
        for col in &self.columns {
            if !seen.insert(col.name.as_str()) {
                return Err(format!("column '{}' is configured twice", col.name));
            }
            match &col.transform {
                ColumnTransform::StandardScale { mean, std } => {
                    if !mean.is_finite() || !std.is_finite() {
                        return Err(format!("column '{}' has a non-finite mean or std", col.name));
                    }
                    if *std < 0.0 {
                        return Err(format!("column '{}' has a negative std {}", col.name, std));
                    }
                }
                ColumnTransform::OneHot { categories, .. } => {
                    if categories.is_empty() {
                        return Err(format!("column '{}' has no categories", col.name));
                    }
                    let unique: HashSet<&str> = categories.iter().map(String::as_str).collect();
                    if unique.len() != categories.len() {
                        return Err(format!("column '{}' repeats a category", col.name));
                    }
                }
                ColumnTransform::Passthrough => {}
            }
        }
        Ok(())
    }

    /// Encoded column names, `<column>_<category>` for one-hot blocks.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for col in &self.columns {
            match &col.transform {
                ColumnTransform::OneHot { categories, .. } => {
                    names.extend(categories.iter().map(|c| format!("{}_{}", col.name, c)));
                }
                _ => names.push(col.name.clone()),
            }
        }
        names
    }

    fn width(&self) -> usize {
        self.columns.iter().map(|c| c.transform.width()).sum()
    }
}

fn numeric(column: &str, value: &FeatureValue) -> Result<f64, PredictionError> {
    match value {
        FeatureValue::Number(v) => Ok(*v),
        FeatureValue::Category(c) => Err(PredictionError::Transform(format!(
            "column '{}' expects a number, got '{}'",
            column, c
        ))),
    }
}

impl Preprocessor for ColumnEncoder {
    fn transform(&self, frame: &FeatureFrame) -> Result<Array2<f32>, PredictionError> {
        let nrows = frame.nrows();
        let ncols = self.width();
        let mut out = Array2::<f32>::zeros((nrows, ncols));

        let mut offset = 0;
        for col in &self.columns {
            let values = frame.column(&col.name).ok_or_else(|| {
                PredictionError::Transform(format!("missing column '{}'", col.name))
            })?;

            for (r, value) in values.iter().enumerate() {
                match &col.transform {
                    ColumnTransform::Passthrough => {
                        out[(r, offset)] = numeric(&col.name, value)? as f32;
                    }
                    ColumnTransform::StandardScale { mean, std } => {
                        let std = std.max(ColumnTransform::MIN_STD);
                        out[(r, offset)] = ((numeric(&col.name, value)? - mean) / std) as f32;
                    }
                    ColumnTransform::OneHot {
                        categories,
                        handle_unknown,
                    } => {
                        let category = match value {
                            FeatureValue::Category(c) => c.clone(),
                            FeatureValue::Number(n) => {
                                return Err(PredictionError::Transform(format!(
                                    "column '{}' expects a category, got {}",
                                    col.name, n
                                )))
                            }
                        };
                        match categories.iter().position(|c| *c == category) {
                            Some(idx) => out[(r, offset + idx)] = 1.0,
                            None if *handle_unknown == HandleUnknown::Ignore => {
                                log::debug!(
                                    "Unknown category '{}' in column '{}' encoded as zeros",
                                    category,
                                    col.name
                                );
                            }
                            None => {
                                return Err(PredictionError::Transform(format!(
                                    "found unknown category '{}' in column '{}'",
                                    category, col.name
                                )))
                            }
                        }
                    }
                }
            }
            offset += col.transform.width();
        }

        Ok(out)
    }

    fn output_width(&self) -> Option<usize> {
        Some(self.width())
    }
}
