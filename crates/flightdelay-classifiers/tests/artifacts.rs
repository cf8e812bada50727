//! Integration tests for loading artifacts from disk.

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::Path;
use std::thread;

use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;

use flightdelay_classifiers::artifacts::{ArtifactSource, LoadedArtifacts};
use flightdelay_classifiers::config::ArtifactConfig;
use flightdelay_classifiers::error::ArtifactKind;
use flightdelay_classifiers::models::DelayLabel;
use flightdelay_classifiers::{
    Carrier, DepartureTimeBlock, FlightQuery, InferencePipeline, PredictionError,
};

const ENCODER_JSON: &str = r#"{
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

/// Width of `ENCODER_JSON`: 3 numeric + 6 blocks + 2 carriers.
const WIDTH: usize = 11;

fn logistic_json(spirit_weight: f32) -> String {
    let mut coefficients = vec![0.0f32; WIDTH];
    coefficients[WIDTH - 1] = spirit_weight;
    serde_json::json!({
        "model_type": "logistic",
        "coefficients": coefficients,
        "intercept": -1.0,
    })
    .to_string()
}

fn source(path: &Path) -> Option<ArtifactSource> {
    Some(ArtifactSource::Local(path.to_path_buf()))
}

fn query(carrier: Carrier) -> FlightQuery {
    FlightQuery::new(2024, 6, 12, DepartureTimeBlock::Evening, carrier).unwrap()
}

// ---------------------------------------------------------------------------
// Successful loads
// ---------------------------------------------------------------------------

#[test]
fn loads_encoder_and_logistic_model() {
    let dir = tempfile::tempdir().unwrap();
    let pre = dir.path().join("preprocessor.json");
    let model = dir.path().join("best_model.json");
    fs::write(&pre, ENCODER_JSON).unwrap();
    fs::write(&model, logistic_json(3.0)).unwrap();

    let loaded = LoadedArtifacts::load(&ArtifactConfig::new(source(&pre), source(&model)));
    assert!(loaded.is_ready(), "errors: {:?}", loaded.errors);
    assert_eq!(loaded.status(ArtifactKind::Model), "loaded");

    let pipeline = InferencePipeline::new(loaded);
    let spirit = pipeline.predict(&query(Carrier::Spirit)).unwrap();
    let delta = pipeline.predict(&query(Carrier::Delta)).unwrap();
    // Unknown carrier is ignored by the encoder, so it scores like Delta.
    let envoy = pipeline.predict(&query(Carrier::Envoy)).unwrap();

    assert_eq!(spirit.label, DelayLabel::Delayed);
    assert_eq!(delta.label, DelayLabel::NotDelayed);
    assert_eq!(envoy, delta);
}

#[test]
fn loads_trained_gbdt_artifact() {
    let mut config = Config::new();
    config.set_feature_size(WIDTH);
    config.set_max_depth(2);
    config.set_iterations(3);
    config.set_shrinkage(0.1);
    config.set_loss("LogLikelyhood");

    let mut train = DataVec::new();
    for i in 0..8 {
        let mut row = vec![0.0f32; WIDTH];
        row[2] = (i * 4) as f32;
        let label = if i < 4 { -1.0 } else { 1.0 };
        train.push(Data::new_training_data(row, 1.0, label, None));
    }
    let mut gbdt = GBDT::new(&config);
    gbdt.fit(&mut train);

    let dir = tempfile::tempdir().unwrap();
    let pre = dir.path().join("preprocessor.json");
    let model = dir.path().join("best_rf_model.json");
    fs::write(&pre, ENCODER_JSON).unwrap();
    let artifact = serde_json::json!({
        "model_type": "gbdt",
        "n_features": WIDTH,
        "model": gbdt,
    });
    fs::write(&model, artifact.to_string()).unwrap();

    let loaded = LoadedArtifacts::load(&ArtifactConfig::new(source(&pre), source(&model)));
    assert!(loaded.is_ready(), "errors: {:?}", loaded.errors);

    let pipeline = InferencePipeline::new(loaded);
    let first = pipeline.predict(&query(Carrier::Delta)).unwrap();
    let second = pipeline.predict(&query(Carrier::Delta)).unwrap();
    assert_eq!(first, second);
    assert!(first.probability.is_some());
}

// ---------------------------------------------------------------------------
// Failed loads leave the slot empty and keep the error
// ---------------------------------------------------------------------------

#[test]
fn missing_model_file_is_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let pre = dir.path().join("preprocessor.json");
    fs::write(&pre, ENCODER_JSON).unwrap();
    let missing = dir.path().join("nope.json");

    let loaded = LoadedArtifacts::load(&ArtifactConfig::new(source(&pre), source(&missing)));
    assert!(loaded.preprocessor.is_some());
    assert!(loaded.model.is_none());
    assert_eq!(loaded.errors.len(), 1);
    assert!(matches!(
        &loaded.errors[0],
        PredictionError::ArtifactLoad { kind: ArtifactKind::Model, .. }
    ));
    assert!(loaded.errors[0].to_string().contains("nope.json"));

    let pipeline = InferencePipeline::new(loaded);
    assert_eq!(
        pipeline.predict(&query(Carrier::Delta)).unwrap_err(),
        PredictionError::ArtifactUnavailable(ArtifactKind::Model)
    );
}

#[test]
fn malformed_files_are_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let pre = dir.path().join("preprocessor.json");
    let model = dir.path().join("best_model.json");
    fs::write(&pre, "not json").unwrap();
    fs::write(&model, r#"{"model_type": "logistic"}"#).unwrap();

    let loaded = LoadedArtifacts::load(&ArtifactConfig::new(source(&pre), source(&model)));
    assert!(!loaded.is_ready());
    assert_eq!(loaded.errors.len(), 2);
    assert!(loaded.errors[0].to_string().starts_with("Error loading preprocessor"));
    assert!(loaded.errors[1].to_string().starts_with("Error loading model"));
}

#[test]
fn width_mismatch_fails_at_predict_not_load() {
    let dir = tempfile::tempdir().unwrap();
    let pre = dir.path().join("preprocessor.json");
    let model = dir.path().join("best_model.json");
    fs::write(&pre, ENCODER_JSON).unwrap();
    fs::write(
        &model,
        r#"{"model_type": "logistic", "coefficients": [1.0, 2.0], "intercept": 0.0}"#,
    )
    .unwrap();

    let loaded = LoadedArtifacts::load(&ArtifactConfig::new(source(&pre), source(&model)));
    assert!(loaded.is_ready());
    let err = InferencePipeline::new(loaded)
        .predict(&query(Carrier::Delta))
        .unwrap_err();
    assert!(matches!(err, PredictionError::Predict(_)));
}

// ---------------------------------------------------------------------------
// Remote sources
// ---------------------------------------------------------------------------

/// Answer exactly one HTTP request with `status` and `body`; returns the URL.
fn serve_once(status: &'static str, body: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut line = String::new();
        while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
            line.clear();
        }
        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
        .unwrap();
        stream.flush().unwrap();
    });
    format!("http://{}/artifact.json", addr)
}

/// A local port nothing listens on.
fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/best_model.json", addr)
}

fn remote(url: &str) -> Option<ArtifactSource> {
    Some(url.parse().unwrap())
}

#[test]
fn loads_artifacts_over_http() {
    let pre = serve_once("200 OK", ENCODER_JSON.to_string());
    let model = serve_once("200 OK", logistic_json(3.0));

    let loaded = LoadedArtifacts::load(&ArtifactConfig::new(remote(&pre), remote(&model)));
    assert!(loaded.is_ready(), "errors: {:?}", loaded.errors);

    let spirit = InferencePipeline::new(loaded)
        .predict(&query(Carrier::Spirit))
        .unwrap();
    assert_eq!(spirit.label, DelayLabel::Delayed);
}

#[test]
fn http_error_status_is_a_load_failure() {
    let pre = serve_once("404 Not Found", "missing".to_string());
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("best_model.json");
    fs::write(&model, logistic_json(3.0)).unwrap();

    let loaded = LoadedArtifacts::load(&ArtifactConfig::new(remote(&pre), source(&model)));
    assert!(!loaded.is_ready());
    assert!(loaded.preprocessor.is_none());
    assert_eq!(loaded.errors.len(), 1);
    let message = loaded.errors[0].to_string();
    assert!(message.starts_with("Error loading preprocessor"), "{}", message);
    assert!(message.contains("404"), "{}", message);
}

#[test]
fn unreachable_host_is_a_load_failure() {
    let dir = tempfile::tempdir().unwrap();
    let pre = dir.path().join("preprocessor.json");
    fs::write(&pre, ENCODER_JSON).unwrap();
    let url = refused_url();

    let loaded = LoadedArtifacts::load(&ArtifactConfig::new(source(&pre), remote(&url)));
    assert!(!loaded.is_ready());
    assert!(loaded.preprocessor.is_some());
    assert_eq!(loaded.errors.len(), 1);
    let message = loaded.errors[0].to_string();
    assert!(message.starts_with("Error loading model"), "{}", message);
    assert!(message.contains("Failed to download"), "{}", message);

    let err = InferencePipeline::new(loaded)
        .predict(&query(Carrier::Delta))
        .unwrap_err();
    assert_eq!(err, PredictionError::ArtifactUnavailable(ArtifactKind::Model));
}
