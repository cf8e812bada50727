//! `flightdelay predict`: one query from flags, or a batch file.
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use flightdelay_classifiers::artifacts::LoadedArtifacts;
use flightdelay_classifiers::io::{delimiter_for, read_queries, write_predictions};
use flightdelay_classifiers::models::{DelayLabel, Prediction};
use flightdelay_classifiers::{FlightQuery, InferencePipeline, PredictionError};

use crate::config::AppConfig;

/// Load both artifacts and report any failure on stderr.
pub fn build_pipeline(config: &AppConfig) -> Result<InferencePipeline> {
    let artifacts = LoadedArtifacts::load(&config.artifact_config()?);
    for err in &artifacts.errors {
        eprintln!("{}", err);
    }
    Ok(InferencePipeline::new(artifacts))
}

/// Reject years the form does not offer.
pub fn check_year(years: &[i32], query: &FlightQuery) -> Result<(), PredictionError> {
    if years.contains(&query.year()) {
        Ok(())
    } else {
        Err(PredictionError::InvalidChoice {
            field: "year",
            value: query.year().to_string(),
        })
    }
}

/// Run one query end to end.
pub fn predict_one(
    pipeline: &InferencePipeline,
    years: &[i32],
    query: &FlightQuery,
) -> Result<Prediction, PredictionError> {
    check_year(years, query)?;
    pipeline.predict(query)
}

/// Totals printed after a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub rows: usize,
    pub delayed: usize,
    pub not_delayed: usize,
    pub failed: usize,
}

/// Predict every row of `input` and write the annotated rows to `output`
/// (stdout when `None`).
pub fn run_batch(
    pipeline: &InferencePipeline,
    config: &AppConfig,
    input: &Path,
    output: Option<&PathBuf>,
) -> Result<BatchSummary> {
    let rows = read_queries(input)?;
    info!(
        "[FlightDelay::Predict] Scoring {} queries from {:?}",
        rows.len(),
        input
    );

    let outcomes: Vec<Result<Prediction, PredictionError>> = rows
        .iter()
        .map(|row| match &row.query {
            Ok(query) => predict_one(pipeline, &config.years, query),
            Err(e) => Err(e.clone()),
        })
        .collect();

    let mut summary = BatchSummary {
        rows: rows.len(),
        ..BatchSummary::default()
    };
    for outcome in &outcomes {
        match outcome {
            Ok(p) if p.label == DelayLabel::Delayed => summary.delayed += 1,
            Ok(_) => summary.not_delayed += 1,
            Err(_) => summary.failed += 1,
        }
    }

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {:?}", path))?;
            write_predictions(BufWriter::new(file), delimiter_for(path), &rows, &outcomes)?;
            info!("[FlightDelay::Predict] Wrote predictions to {:?}", path);
        }
        None => {
            write_predictions(io::stdout().lock(), delimiter_for(input), &rows, &outcomes)?;
        }
    }

    Ok(summary)
}
