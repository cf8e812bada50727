//! Query → feature frame → `transform` → `predict`.
use log::debug;

use crate::artifacts::LoadedArtifacts;
use crate::error::{ArtifactKind, PredictionError};
use crate::frame::FeatureFrame;
use crate::models::Prediction;
use crate::query::FlightQuery;

/// Runs the loaded artifacts on validated queries.
///
/// Artifacts are read-only after construction, so one pipeline can serve any
/// number of submissions.
pub struct InferencePipeline {
    artifacts: LoadedArtifacts,
}

impl InferencePipeline {
    pub fn new(artifacts: LoadedArtifacts) -> Self {
        Self { artifacts }
    }

    /// Errors recorded while loading the artifacts.
    pub fn load_errors(&self) -> &[PredictionError] {
        &self.artifacts.errors
    }

    pub fn artifacts(&self) -> &LoadedArtifacts {
        &self.artifacts
    }

    /// Predict a single query.
    pub fn predict(&self, query: &FlightQuery) -> Result<Prediction, PredictionError> {
        let mut predictions = self.run(FeatureFrame::from_query(query))?;
        predictions
            .pop()
            .ok_or_else(|| PredictionError::Predict("model returned no prediction".to_string()))
    }

    /// Predict each query on its own; one failing row does not affect the others.
    pub fn predict_each(&self, queries: &[FlightQuery]) -> Vec<Result<Prediction, PredictionError>> {
        queries.iter().map(|q| self.predict(q)).collect()
    }

    fn run(&self, frame: FeatureFrame) -> Result<Vec<Prediction>, PredictionError> {
        let preprocessor = self
            .artifacts
            .preprocessor
            .as_ref()
            .ok_or(PredictionError::ArtifactUnavailable(ArtifactKind::Preprocessor))?;
        let model = self
            .artifacts
            .model
            .as_ref()
            .ok_or(PredictionError::ArtifactUnavailable(ArtifactKind::Model))?;

        let encoded = preprocessor.transform(&frame)?;
        if encoded.nrows() != frame.nrows() {
            return Err(PredictionError::Transform(format!(
                "preprocessor returned {} rows for {} inputs",
                encoded.nrows(),
                frame.nrows()
            )));
        }
        debug!(
            "[FlightDelay::Pipeline] Encoded {} row(s) into {} feature(s)",
            encoded.nrows(),
            encoded.ncols()
        );

        let predictions = model.predict(&encoded)?;
        if predictions.len() != frame.nrows() {
            return Err(PredictionError::Predict(format!(
                "{} returned {} predictions for {} rows",
                model.name(),
                predictions.len(),
                frame.nrows()
            )));
        }
        Ok(predictions)
    }
}
