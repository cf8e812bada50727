use std::fmt;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::PredictionError;

/// Binary outcome: `1` when the flight arrives 15 minutes late or more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "i64")]
pub enum DelayLabel {
    NotDelayed,
    Delayed,
}

impl DelayLabel {
    /// Interpret an integer class label. Anything other than 0/1 is a
    /// prediction failure rather than a silent "not delayed".
    pub fn from_raw(raw: i64) -> Result<Self, PredictionError> {
        match raw {
            0 => Ok(DelayLabel::NotDelayed),
            1 => Ok(DelayLabel::Delayed),
            other => Err(PredictionError::Predict(format!(
                "model returned label {}, expected 0 or 1",
                other
            ))),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            DelayLabel::NotDelayed => 0,
            DelayLabel::Delayed => 1,
        }
    }
}

impl From<DelayLabel> for u8 {
    fn from(label: DelayLabel) -> Self {
        label.as_u8()
    }
}

impl TryFrom<i64> for DelayLabel {
    type Error = PredictionError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        DelayLabel::from_raw(raw)
    }
}

impl fmt::Display for DelayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Model output for one row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: DelayLabel,
    /// Probability of `Delayed`, when the model produces one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<f32>,
}

impl Prediction {
    pub fn from_label(label: DelayLabel) -> Self {
        Self {
            label,
            probability: None,
        }
    }

    /// Threshold a raw score that is not a probability; none is reported.
    pub fn from_score(score: f32, threshold: f32) -> Self {
        Self {
            probability: None,
            ..Self::from_probability(score, threshold)
        }
    }

    /// Threshold a probability of delay.
    pub fn from_probability(probability: f32, threshold: f32) -> Self {
        let label = if probability >= threshold {
            DelayLabel::Delayed
        } else {
            DelayLabel::NotDelayed
        };
        Self {
            label,
            probability: Some(probability),
        }
    }
}

/// A pre-trained binary classifier consumed by the inference pipeline.
///
/// Implementations never train; they only score an already encoded matrix.
pub trait ClassifierModel {
    /// Predict one `Prediction` per row of `x`.
    fn predict(&self, x: &Array2<f32>) -> Result<Vec<Prediction>, PredictionError>;

    /// Number of encoded features the model was built for, when known.
    fn n_features(&self) -> Option<usize> {
        None
    }

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}

/// Reject a matrix whose width does not match what the model was built for.
pub(crate) fn check_width(model: &str, expected: usize, x: &Array2<f32>) -> Result<(), PredictionError> {
    if x.ncols() != expected {
        return Err(PredictionError::Predict(format!(
            "{} expects {} features, got {}",
            model,
            expected,
            x.ncols()
        )));
    }
    Ok(())
}
