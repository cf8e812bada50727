use std::str::FromStr;

use crate::config::ModelType;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::gbdt::{GBDTClassifier, GbdtArtifact};
use crate::models::logistic::LogisticClassifier;

/// Boxed model shared read-only across submissions.
pub type SharedModel = Box<dyn ClassifierModel + Send + Sync>;

/// Build a boxed classifier model from a model artifact.
///
/// The artifact is a JSON object whose `model_type` field selects the
/// implementation; the remaining fields are that implementation's payload.
pub fn build_model(bytes: &[u8]) -> Result<SharedModel, String> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| format!("invalid model JSON: {}", e))?;

    let model_type = value
        .get("model_type")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "model artifact has no 'model_type' field".to_string())?;

    match ModelType::from_str(model_type)? {
        ModelType::Gbdt => {
            let artifact: GbdtArtifact = serde_json::from_value(value)
                .map_err(|e| format!("invalid gbdt artifact: {}", e))?;
            Ok(Box::new(GBDTClassifier::from_artifact(artifact)?))
        }
        ModelType::Logistic => {
            let model: LogisticClassifier = serde_json::from_value(value)
                .map_err(|e| format!("invalid logistic artifact: {}", e))?;
            model.validate()?;
            Ok(Box::new(model))
        }
    }
}
