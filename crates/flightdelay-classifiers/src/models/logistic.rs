use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::PredictionError;
use crate::models::classifier_trait::{check_width, ClassifierModel, Prediction};

fn default_threshold() -> f32 {
    0.5
}

/// Fitted logistic regression: `p = sigmoid(x . coefficients + intercept)`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LogisticClassifier {
    pub coefficients: Vec<f32>,
    pub intercept: f32,
    #[serde(default = "default_threshold")]
    pub threshold: f32,
}

impl LogisticClassifier {
    pub fn validate(&self) -> Result<(), String> {
        if self.coefficients.is_empty() {
            return Err("logistic model has no coefficients".to_string());
        }
        if self.coefficients.iter().any(|c| !c.is_finite()) || !self.intercept.is_finite() {
            return Err("logistic model has non-finite weights".to_string());
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(format!("logistic threshold {} is outside [0, 1]", self.threshold));
        }
        Ok(())
    }
}

fn sigmoid(z: f32) -> f32 {
    1.0 / (1.0 + (-z).exp())
}

impl ClassifierModel for LogisticClassifier {
    fn predict(&self, x: &Array2<f32>) -> Result<Vec<Prediction>, PredictionError> {
        check_width(self.name(), self.coefficients.len(), x)?;

        let weights = Array1::from_vec(self.coefficients.clone());
        let margins = x.dot(&weights);
        Ok(margins
            .iter()
            .map(|z| Prediction::from_probability(sigmoid(z + self.intercept), self.threshold))
            .collect())
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn name(&self) -> &str {
        "logistic"
    }
}
