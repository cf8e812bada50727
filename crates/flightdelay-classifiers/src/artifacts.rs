//! Locating, fetching and deserializing the preprocessor and model artifacts.
//!
//! A load failure never aborts the process. It is logged, kept on
//! `LoadedArtifacts::errors` for display, and the matching slot stays `None`
//! so the pipeline can refuse to run.
use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::ArtifactConfig;
use crate::error::{ArtifactKind, PredictionError};
use crate::models::factory::{build_model, SharedModel};
use crate::preprocessing::{ColumnEncoder, Preprocessor};

/// Boxed preprocessor shared read-only across submissions.
pub type SharedPreprocessor = Box<dyn Preprocessor + Send + Sync>;

/// Environment variable naming a directory searched for default artifact names.
pub const ARTIFACTS_DIR_ENV: &str = "FLIGHTDELAY_ARTIFACTS_DIR";

/// File names tried, in order, when no preprocessor source is configured.
pub const DEFAULT_PREPROCESSOR_NAMES: [&str; 2] = ["preprocessor.json", "my_preprocessor.json"];

/// File names tried, in order, when no model source is configured.
pub const DEFAULT_MODEL_NAMES: [&str; 2] = ["best_rf_model.json", "best_model.json"];

/// A local file or a URL fetched with an unauthenticated GET.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ArtifactSource {
    Local(PathBuf),
    Remote(String),
}

impl FromStr for ArtifactSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("artifact source must not be empty".to_string());
        }
        let lower = s.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(ArtifactSource::Remote(s.to_string()))
        } else {
            Ok(ArtifactSource::Local(PathBuf::from(s)))
        }
    }
}

impl TryFrom<String> for ArtifactSource {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ArtifactSource> for String {
    fn from(source: ArtifactSource) -> Self {
        source.to_string()
    }
}

impl fmt::Display for ArtifactSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactSource::Local(path) => write!(f, "{}", path.display()),
            ArtifactSource::Remote(url) => write!(f, "{}", url),
        }
    }
}

/// Read the raw bytes behind a source.
pub fn fetch_bytes(source: &ArtifactSource) -> Result<Vec<u8>> {
    match source {
        ArtifactSource::Local(path) => {
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        ArtifactSource::Remote(url) => {
            info!("[FlightDelay::Artifacts] Downloading {}", url);
            let response = reqwest::blocking::get(url)
                .with_context(|| format!("Failed to download {}", url))?
                .error_for_status()
                .with_context(|| format!("Download of {} was refused", url))?;
            let bytes = response
                .bytes()
                .with_context(|| format!("Failed to read response body from {}", url))?;
            Ok(bytes.to_vec())
        }
    }
}

/// Try to locate an artifact by its default file names.
///
/// Search order:
/// 1. Directory pointed to by `FLIGHTDELAY_ARTIFACTS_DIR`.
/// 2. The current working directory.
pub fn locate_default(kind: ArtifactKind) -> Result<PathBuf> {
    let names: &[&str] = match kind {
        ArtifactKind::Preprocessor => &DEFAULT_PREPROCESSOR_NAMES,
        ArtifactKind::Model => &DEFAULT_MODEL_NAMES,
    };

    let mut dirs = Vec::new();
    if let Ok(dir) = env::var(ARTIFACTS_DIR_ENV) {
        dirs.push(PathBuf::from(dir));
    }
    dirs.push(PathBuf::from("."));

    locate_in(&dirs, names).ok_or_else(|| {
        anyhow!(
            "no {} found; tried {} in {}. Pass an explicit path or set {}",
            kind,
            names.join(", "),
            dirs.iter()
                .map(|d| format!("'{}'", d.display()))
                .collect::<Vec<_>>()
                .join(", "),
            ARTIFACTS_DIR_ENV
        )
    })
}

fn locate_in(dirs: &[PathBuf], names: &[&str]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
        .find(|candidate| candidate.is_file())
}

fn resolve(kind: ArtifactKind, configured: Option<&ArtifactSource>) -> Result<ArtifactSource> {
    match configured {
        Some(source) => Ok(source.clone()),
        None => locate_default(kind).map(ArtifactSource::Local),
    }
}

/// Load and deserialize the preprocessor artifact.
pub fn load_preprocessor(source: &ArtifactSource) -> Result<SharedPreprocessor> {
    let bytes = fetch_bytes(source)?;
    let encoder = ColumnEncoder::from_json_slice(&bytes).map_err(|e| anyhow!(e))?;
    Ok(Box::new(encoder))
}

/// Load and deserialize the model artifact.
pub fn load_model(source: &ArtifactSource) -> Result<SharedModel> {
    let bytes = fetch_bytes(source)?;
    build_model(&bytes).map_err(|e| anyhow!(e))
}

fn load_error(kind: ArtifactKind, err: anyhow::Error) -> PredictionError {
    let err = PredictionError::ArtifactLoad {
        kind,
        reason: format!("{:#}", err),
    };
    error!("[FlightDelay::Artifacts] {}", err);
    err
}

/// The pair of artifacts the pipeline runs on, plus any load failures.
#[derive(Default)]
pub struct LoadedArtifacts {
    pub preprocessor: Option<SharedPreprocessor>,
    pub model: Option<SharedModel>,
    pub errors: Vec<PredictionError>,
}

impl LoadedArtifacts {
    /// Wrap already constructed artifacts.
    pub fn new(preprocessor: SharedPreprocessor, model: SharedModel) -> Self {
        Self {
            preprocessor: Some(preprocessor),
            model: Some(model),
            errors: Vec::new(),
        }
    }

    /// Load both artifacts. Never fails; see `errors` for what went wrong.
    pub fn load(config: &ArtifactConfig) -> Self {
        let mut loaded = LoadedArtifacts::default();

        match resolve(ArtifactKind::Preprocessor, config.preprocessor.as_ref())
            .and_then(|source| load_preprocessor(&source))
        {
            Ok(preprocessor) => {
                info!("[FlightDelay::Artifacts] Preprocessor loaded successfully.");
                loaded.preprocessor = Some(preprocessor);
            }
            Err(e) => loaded.errors.push(load_error(ArtifactKind::Preprocessor, e)),
        }

        match resolve(ArtifactKind::Model, config.model.as_ref())
            .and_then(|source| load_model(&source))
        {
            Ok(model) => {
                info!(
                    "[FlightDelay::Artifacts] Model loaded successfully ({}).",
                    model.name()
                );
                loaded.model = Some(model);
            }
            Err(e) => loaded.errors.push(load_error(ArtifactKind::Model, e)),
        }

        loaded.warn_on_width_mismatch();
        loaded
    }

    fn warn_on_width_mismatch(&self) {
        let (Some(preprocessor), Some(model)) = (&self.preprocessor, &self.model) else {
            return;
        };
        if let (Some(produced), Some(expected)) = (preprocessor.output_width(), model.n_features())
        {
            if produced != expected {
                warn!(
                    "[FlightDelay::Artifacts] Preprocessor produces {} features but the {} model expects {}; predictions will fail",
                    produced,
                    model.name(),
                    expected
                );
            }
        }
    }

    /// Both artifacts are present.
    pub fn is_ready(&self) -> bool {
        self.preprocessor.is_some() && self.model.is_some()
    }

    pub fn status(&self, kind: ArtifactKind) -> &'static str {
        let loaded = match kind {
            ArtifactKind::Preprocessor => self.preprocessor.is_some(),
            ArtifactKind::Model => self.model.is_some(),
        };
        if loaded {
            "loaded"
        } else {
            "unavailable"
        }
    }
}
