use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::artifacts::ArtifactSource;

/// Supported model artifact kinds.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    Gbdt,
    Logistic,
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gbdt" => Ok(ModelType::Gbdt),
            "logistic" | "logistic_regression" => Ok(ModelType::Logistic),
            _ => Err(format!(
                "Unknown model type: {}. Supported model types are 'gbdt' and 'logistic'",
                s
            )),
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelType::Gbdt => write!(f, "gbdt"),
            ModelType::Logistic => write!(f, "logistic"),
        }
    }
}

/// Where to load each artifact from. `None` means search the default names.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactConfig {
    pub preprocessor: Option<ArtifactSource>,
    pub model: Option<ArtifactSource>,
}

impl ArtifactConfig {
    pub fn new(preprocessor: Option<ArtifactSource>, model: Option<ArtifactSource>) -> Self {
        Self {
            preprocessor,
            model,
        }
    }
}
