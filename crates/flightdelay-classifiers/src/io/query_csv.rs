//! CSV/TSV batch files of flight queries and their predictions.
use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use csv::StringRecord;

use crate::error::PredictionError;
use crate::frame::QUERY_COLUMNS;
use crate::models::Prediction;
use crate::query::FlightQuery;
use crate::render::message;

/// One input row. Invalid rows are kept so they show up in the output.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRow {
    /// 1-based data row number (header excluded).
    pub row: usize,
    pub raw: Vec<String>,
    pub query: Result<FlightQuery, PredictionError>,
}

/// `\t` for `.tsv` files, `,` otherwise.
pub fn delimiter_for(path: &Path) -> u8 {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("tsv") => b'\t',
        _ => b',',
    }
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name))
}

/// Read queries from a file with a `Year,Month,Day,Dep_Time_Block_Group,Carrier`
/// header (any column order, extra columns ignored).
pub fn read_queries<P: AsRef<Path>>(path: P) -> Result<Vec<QueryRow>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter_for(path))
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open query file: {}", path.display()))?;

    let headers = reader
        .headers()
        .context("Failed to read query header row")?
        .clone();

    let mut indices = Vec::with_capacity(QUERY_COLUMNS.len());
    for name in QUERY_COLUMNS {
        let idx = find_column(&headers, name)
            .ok_or_else(|| anyhow!("Missing column '{}' in {}", name, path.display()))?;
        indices.push(idx);
    }

    let mut rows = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;
        let raw: Vec<String> = indices
            .iter()
            .map(|&i| record.get(i).unwrap_or("").to_string())
            .collect();
        let query = FlightQuery::parse(&raw[0], &raw[1], &raw[2], &raw[3], &raw[4]);
        rows.push(QueryRow {
            row: row_idx + 1,
            raw,
            query,
        });
    }
    Ok(rows)
}

/// Write input columns plus `label, probability, message, error`.
pub fn write_predictions<W: Write>(
    writer: W,
    delimiter: u8,
    rows: &[QueryRow],
    outcomes: &[Result<Prediction, PredictionError>],
) -> Result<()> {
    if rows.len() != outcomes.len() {
        anyhow::bail!(
            "{} rows but {} outcomes; refusing to misalign output",
            rows.len(),
            outcomes.len()
        );
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    let mut header: Vec<&str> = QUERY_COLUMNS.to_vec();
    header.extend(["label", "probability", "message", "error"]);
    writer.write_record(&header)?;

    for (row, outcome) in rows.iter().zip(outcomes) {
        let mut record = row.raw.clone();
        match outcome {
            Ok(p) => {
                record.push(p.label.to_string());
                record.push(p.probability.map_or(String::new(), |v| format!("{:.4}", v)));
                record.push(message(p.label).to_string());
                record.push(String::new());
            }
            Err(e) => {
                record.extend([String::new(), String::new(), String::new(), e.to_string()]);
            }
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
