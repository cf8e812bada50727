//! Artifact fixtures shared by the CLI and server tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Encoder over the five query columns. Width: 3 numeric + 6 blocks + 2 carriers.
pub const ENCODER_JSON: &str = r#"{
  "columns": [
    {"name": "Year", "transform": {"standard_scale": {"mean": 2024.5, "std": 0.5}}},
    {"name": "Month", "transform": "passthrough"},
    {"name": "Day", "transform": "passthrough"},
    {"name": "Dep_Time_Block_Group", "transform": {"one_hot": {
        "categories": ["Night", "Early Morning", "Evening", "Morning", "Afternoon", "Early Afternoon"]
    }}},
    {"name": "Carrier", "transform": {"one_hot": {
        "categories": ["Delta Air Lines Inc.", "Spirit Air Lines"],
        "handle_unknown": "ignore"
    }}}
  ]
}"#;

pub const WIDTH: usize = 11;

/// Logistic model that only looks at the Spirit column: Spirit scores
/// sigmoid(2) (delayed), every other carrier sigmoid(-1) (not delayed).
pub fn logistic_json() -> String {
    let mut coefficients = vec![0.0f32; WIDTH];
    coefficients[WIDTH - 1] = 3.0;
    serde_json::json!({
        "model_type": "logistic",
        "coefficients": coefficients,
        "intercept": -1.0,
    })
    .to_string()
}

/// Write both artifacts under their default names in `dir`.
pub fn write_artifacts(dir: &Path) -> (PathBuf, PathBuf) {
    let pre = dir.join("preprocessor.json");
    let model = dir.join("best_model.json");
    fs::write(&pre, ENCODER_JSON).unwrap();
    fs::write(&model, logistic_json()).unwrap();
    (pre, model)
}
