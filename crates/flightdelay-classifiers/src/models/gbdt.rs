use std::panic::{self, AssertUnwindSafe};

use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::PredictionError;
use crate::models::classifier_trait::{check_width, ClassifierModel, Prediction};

fn default_threshold() -> f32 {
    0.5
}

/// Losses for which `GBDT::predict` returns the probability of the positive class.
const PROBABILITY_LOSSES: [&str; 3] = ["LogLikelyhood", "BinaryLogistic", "RegLogistic"];

/// Read the training loss from the model's own serde form. Unknown means raw scores.
fn outputs_probabilities(model: &GBDT) -> bool {
    serde_json::to_value(model)
        .ok()
        .and_then(|value| {
            value
                .pointer("/conf/loss")
                .and_then(|loss| loss.as_str())
                .map(|loss| PROBABILITY_LOSSES.contains(&loss))
        })
        .unwrap_or(false)
}

/// On-disk form of a gradient boosted tree model.
///
/// `model` is the `gbdt` crate's own serde representation (what
/// `GBDT::save_model` writes). Scores are reported as probabilities only when
/// the model was trained with a probability-producing loss such as
/// `LogLikelyhood`; otherwise the raw score is thresholded.
#[derive(Serialize, Deserialize)]
pub struct GbdtArtifact {
    pub n_features: usize,
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    pub model: GBDT,
}

/// Gradient Boosting Decision Tree (GBDT) classifier
pub struct GBDTClassifier {
    model: GBDT,
    n_features: usize,
    threshold: f32,
    probabilistic: bool,
}

impl GBDTClassifier {
    pub fn new(model: GBDT, n_features: usize, threshold: f32) -> Self {
        let probabilistic = outputs_probabilities(&model);
        if !probabilistic {
            log::warn!(
                "[FlightDelay::Models] gbdt model was not trained with a probability loss; reporting labels without probabilities"
            );
        }
        GBDTClassifier {
            model,
            n_features,
            threshold,
            probabilistic,
        }
    }

    pub fn from_artifact(artifact: GbdtArtifact) -> Result<Self, String> {
        if artifact.n_features == 0 {
            return Err("gbdt artifact declares zero features".to_string());
        }
        if !(0.0..=1.0).contains(&artifact.threshold) {
            return Err(format!(
                "gbdt threshold {} is outside [0, 1]",
                artifact.threshold
            ));
        }
        Ok(Self::new(
            artifact.model,
            artifact.n_features,
            artifact.threshold,
        ))
    }
}

impl ClassifierModel for GBDTClassifier {
    fn predict(&self, x: &Array2<f32>) -> Result<Vec<Prediction>, PredictionError> {
        check_width(self.name(), self.n_features, x)?;

        let mut test_x = DataVec::new();
        for row in x.rows() {
            test_x.push(Data::new_test_data(row.to_vec(), None));
        }
        // gbdt asserts on malformed ensembles instead of returning an error.
        let probabilities =
            panic::catch_unwind(AssertUnwindSafe(|| self.model.predict(&test_x))).map_err(|_| {
                PredictionError::Predict("gbdt panicked while scoring".to_string())
            })?;
        if probabilities.len() != x.nrows() {
            return Err(PredictionError::Predict(format!(
                "gbdt returned {} scores for {} rows",
                probabilities.len(),
                x.nrows()
            )));
        }

        probabilities
            .into_iter()
            .map(|p| {
                if !p.is_finite() {
                    Err(PredictionError::Predict(format!("gbdt returned a non-finite score {}", p)))
                } else if self.probabilistic {
                    Ok(Prediction::from_probability(p, self.threshold))
                } else {
                    Ok(Prediction::from_score(p, self.threshold))
                }
            })
            .collect()
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }

    fn name(&self) -> &str {
        "gbdt"
    }
}
