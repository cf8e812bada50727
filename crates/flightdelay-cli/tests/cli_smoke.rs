//! CLI binary smoke tests using assert_cmd.
//!
//! These tests exercise the compiled `flightdelay` binary end to end:
//! argument parsing, date validation, artifact loading and output.

mod common;

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("flightdelay").unwrap();
    cmd.env_remove("FLIGHTDELAY_ARTIFACTS_DIR");
    cmd
}

fn query_args<'a>(year: &'a str, month: &'a str, day: &'a str, carrier: &'a str) -> Vec<&'a str> {
    vec![
        "predict",
        "--year",
        year,
        "--month",
        month,
        "--day",
        day,
        "--dep-time-block",
        "early-morning",
        "--carrier",
        carrier,
    ]
}

// ---------------------------------------------------------------------------
// Top-level
// ---------------------------------------------------------------------------

#[test]
fn no_args_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("predict"))
        .stdout(predicate::str::contains("choices"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("flightdelay"));
}

// ---------------------------------------------------------------------------
// Choices
// ---------------------------------------------------------------------------

#[test]
fn choices_lists_blocks_and_carriers() {
    cmd()
        .arg("choices")
        .assert()
        .success()
        .stdout(predicate::str::contains("Early Afternoon"))
        .stdout(predicate::str::contains("12:00 PM - 3:00 PM"))
        .stdout(predicate::str::contains("Hawaiian Airlines Inc."))
        .stdout(predicate::str::contains("2025"));
}

// ---------------------------------------------------------------------------
// Predict: argument validation
// ---------------------------------------------------------------------------

#[test]
fn predict_requires_query_fields() {
    cmd()
        .arg("predict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--year"));
}

#[test]
fn predict_rejects_month_out_of_range() {
    cmd()
        .args(query_args("2024", "13", "1", "Envoy Air"))
        .assert()
        .failure();
}

#[test]
fn predict_rejects_unknown_carrier() {
    cmd()
        .args(query_args("2024", "1", "1", "Pan Am"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("'Pan Am' is not a valid carrier."));
}

#[test]
fn impossible_date_fails_before_loading_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .current_dir(dir.path())
        .args(query_args("2025", "2", "29", "Envoy Air"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Day 29 is not valid for February 2025."))
        .stderr(predicate::str::contains("Error loading").not());
}

#[test]
fn missing_artifacts_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .current_dir(dir.path())
        .args(query_args("2024", "2", "29", "Envoy Air"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error loading preprocessor"))
        .stderr(predicate::str::contains("Error loading model"))
        .stdout(predicate::str::is_empty());
}

// ---------------------------------------------------------------------------
// Predict: with artifacts
// ---------------------------------------------------------------------------

#[test]
fn predicts_from_default_artifact_names() {
    let dir = tempfile::tempdir().unwrap();
    common::write_artifacts(dir.path());

    cmd()
        .current_dir(dir.path())
        .args(query_args("2024", "7", "4", "spirit-air-lines"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "The flight will likely be delayed upon arrival by 15 minutes or more.",
        ));
}

#[test]
fn predicts_from_explicit_paths() {
    let artifacts = tempfile::tempdir().unwrap();
    let (pre, model) = common::write_artifacts(artifacts.path());
    let cwd = tempfile::tempdir().unwrap();

    cmd()
        .current_dir(cwd.path())
        .args(query_args("2025", "12", "31", "Delta Air Lines Inc."))
        .args(["--preprocessor", pre.to_str().unwrap()])
        .args(["--model", model.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "The flight will likely not be delayed upon arrival by 15 minutes or more.",
        ));
}

#[test]
fn artifacts_dir_env_is_searched() {
    let artifacts = tempfile::tempdir().unwrap();
    common::write_artifacts(artifacts.path());
    let cwd = tempfile::tempdir().unwrap();

    cmd()
        .current_dir(cwd.path())
        .env("FLIGHTDELAY_ARTIFACTS_DIR", artifacts.path())
        .args(query_args("2024", "1", "15", "Envoy Air"))
        .assert()
        .success()
        .stdout(predicate::str::contains("not be delayed"));
}

#[test]
fn year_outside_offered_years_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    common::write_artifacts(dir.path());

    cmd()
        .current_dir(dir.path())
        .args(query_args("2023", "5", "5", "Envoy Air"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("'2023' is not a valid year."));
}

#[test]
fn year_outside_offered_years_fails_before_loading_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .current_dir(dir.path())
        .args(query_args("2023", "5", "5", "Envoy Air"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("'2023' is not a valid year."))
        .stderr(predicate::str::contains("Error loading").not());
}

// ---------------------------------------------------------------------------
// Predict: batch
// ---------------------------------------------------------------------------

#[test]
fn batch_writes_one_line_per_row() {
    let dir = tempfile::tempdir().unwrap();
    common::write_artifacts(dir.path());
    let input = dir.path().join("queries.csv");
    fs::write(
        &input,
        "Year,Month,Day,Dep_Time_Block_Group,Carrier\n\
         2024,3,10,Evening,Spirit Air Lines\n\
         2024,3,10,Evening,Delta Air Lines Inc.\n\
         2025,2,29,Evening,Delta Air Lines Inc.\n",
    )
    .unwrap();
    let output = dir.path().join("predictions.csv");

    cmd()
        .current_dir(dir.path())
        .args(["predict", "--batch"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Completed 3 rows: 1 delayed, 1 not delayed, 1 failed.",
        ));

    let text = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[0],
        "Year,Month,Day,Dep_Time_Block_Group,Carrier,label,probability,message,error"
    );
    assert!(lines[1].contains(",1,"));
    assert!(lines[2].contains(",0,"));
    assert!(lines[3].contains("Day 29 is not valid for February 2025."));
}

#[test]
fn batch_conflicts_with_query_flags() {
    cmd()
        .args(["predict", "--batch", "queries.csv", "--year", "2024"])
        .assert()
        .failure();
}
