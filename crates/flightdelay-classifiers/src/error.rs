use std::fmt;

use thiserror::Error;

/// The two artifacts the pipeline depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Preprocessor,
    Model,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ArtifactKind::Preprocessor => write!(f, "preprocessor"),
            ArtifactKind::Model => write!(f, "model"),
        }
    }
}

/// Every way a single submission can fail.
///
/// None of these are fatal to the process: callers render the message and
/// wait for the next submission.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("Error loading {kind}: {reason}")]
    ArtifactLoad { kind: ArtifactKind, reason: String },

    #[error("The {0} is not loaded; fix the load error and restart before predicting.")]
    ArtifactUnavailable(ArtifactKind),

    #[error("Month {0} is not valid; choose a number from 1 (January) to 12 (December).")]
    InvalidMonth(u32),

    #[error("Day {day} is not valid for {month_name} {year}.")]
    InvalidDay {
        day: u32,
        month_name: String,
        year: i32,
    },

    #[error("'{value}' is not a valid {field}.")]
    InvalidChoice { field: &'static str, value: String },

    #[error("Error preprocessing features: {0}")]
    Transform(String),

    #[error("Error making prediction: {0}")]
    Predict(String),
}

impl PredictionError {
    /// Short machine readable code, used by the JSON endpoint.
    pub fn code(&self) -> &'static str {
        match self {
            PredictionError::ArtifactLoad { .. } => "ARTIFACT_LOAD",
            PredictionError::ArtifactUnavailable(_) => "ARTIFACT_UNAVAILABLE",
            PredictionError::InvalidMonth(_) => "INVALID_MONTH",
            PredictionError::InvalidDay { .. } => "INVALID_DAY",
            PredictionError::InvalidChoice { .. } => "INVALID_CHOICE",
            PredictionError::Transform(_) => "TRANSFORM_FAILED",
            PredictionError::Predict(_) => "PREDICT_FAILED",
        }
    }

    /// True for errors caused by the submitted values rather than the artifacts.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PredictionError::InvalidMonth(_)
                | PredictionError::InvalidDay { .. }
                | PredictionError::InvalidChoice { .. }
        )
    }
}
