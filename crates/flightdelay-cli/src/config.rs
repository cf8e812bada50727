use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};

use flightdelay_classifiers::artifacts::ArtifactSource;
use flightdelay_classifiers::config::ArtifactConfig;
use flightdelay_classifiers::query::DEFAULT_YEARS;

/// Settings shared by every subcommand.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    pub version: String,
    /// Preprocessor path or URL. Empty means search the default file names.
    pub preprocessor: Option<String>,
    /// Model path or URL. Empty means search the default file names.
    pub model: Option<String>,
    /// Years the form offers.
    pub years: Vec<i32>,
    pub host: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            version: clap::crate_version!().to_string(),
            preprocessor: None,
            model: None,
            years: DEFAULT_YEARS.to_vec(),
            host: String::from("127.0.0.1"),
            port: 8501,
        }
    }
}

impl AppConfig {
    /// Read a JSON config, falling back to defaults field by field.
    pub fn from_file(config_path: &PathBuf) -> Result<Self> {
        let config_json = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let partial: serde_json::Value = serde_json::from_str(&config_json)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;
        let mut config = AppConfig::default();

        macro_rules! load_or_default {
            ($field:ident) => {
                if let Some(val) = partial.get(stringify!($field)) {
                    if let Ok(parsed) = serde_json::from_value(val.clone()) {
                        config.$field = parsed;
                    } else {
                        log::warn!(
                            "Config Invalid value for '{}', using default: {:?}",
                            stringify!($field), config.$field
                        );
                    }
                } else {
                    log::warn!(
                        "Config Missing field '{}', using default: {:?}",
                        stringify!($field), config.$field
                    );
                }
            };
        }

        load_or_default!(preprocessor);
        load_or_default!(model);
        load_or_default!(years);
        load_or_default!(host);
        load_or_default!(port);

        if config.years.is_empty() {
            log::warn!("Config 'years' is empty, using default: {:?}", DEFAULT_YEARS);
            config.years = DEFAULT_YEARS.to_vec();
        }

        Ok(config)
    }

    /// Load the optional config file, then apply command line overrides.
    pub fn from_arguments(matches: &ArgMatches) -> Result<Self> {
        let mut config = match matches.get_one::<PathBuf>("config") {
            Some(path) => {
                log::info!("[FlightDelay::Config] Using config: {:?}", path);
                AppConfig::from_file(path)?
            }
            None => AppConfig::default(),
        };

        if let Some(preprocessor) = get_string(matches, "preprocessor") {
            config.preprocessor = Some(preprocessor);
        }
        if let Some(model) = get_string(matches, "model") {
            config.model = Some(model);
        }
        if let Some(host) = get_string(matches, "host") {
            config.host = host;
        }
        if let Ok(Some(port)) = matches.try_get_one::<u16>("port") {
            config.port = *port;
        }

        Ok(config)
    }

    pub fn artifact_config(&self) -> Result<ArtifactConfig> {
        Ok(ArtifactConfig::new(
            parse_source(self.preprocessor.as_deref())?,
            parse_source(self.model.as_deref())?,
        ))
    }
}

/// Missing args on subcommands that do not declare them are not an error.
fn get_string(matches: &ArgMatches, id: &str) -> Option<String> {
    matches.try_get_one::<String>(id).ok().flatten().cloned()
}

fn parse_source(value: Option<&str>) -> Result<Option<ArtifactSource>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(anyhow::Error::msg),
    }
}
