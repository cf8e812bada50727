//! Integration tests for the column encoder.

use flightdelay_classifiers::frame::FeatureFrame;
use flightdelay_classifiers::preprocessing::{ColumnEncoder, Preprocessor};
use flightdelay_classifiers::{Carrier, DepartureTimeBlock, FlightQuery, PredictionError};

fn encoder(handle_unknown: &str) -> ColumnEncoder {
    let json = format!(
        r#"{{"columns": [
            {{"name": "Month", "transform": {{"standard_scale": {{"mean": 6.0, "std": 2.0}}}}}},
            {{"name": "Carrier", "transform": {{"one_hot": {{
                "categories": ["Envoy Air", "JetBlue Airways", "Allegiant Air"],
                "handle_unknown": "{}"
            }}}}}},
            {{"name": "Day", "transform": "passthrough"}}
        ]}}"#,
        handle_unknown
    );
    ColumnEncoder::from_json_slice(json.as_bytes()).unwrap()
}

fn frame(carrier: Carrier) -> FeatureFrame {
    let q = FlightQuery::new(2024, 10, 5, DepartureTimeBlock::Afternoon, carrier).unwrap();
    FeatureFrame::from_query(&q)
}

#[test]
fn encodes_in_configured_order() {
    let enc = encoder("error");
    assert_eq!(enc.output_width(), Some(5));
    assert_eq!(
        enc.feature_names(),
        vec![
            "Month",
            "Carrier_Envoy Air",
            "Carrier_JetBlue Airways",
            "Carrier_Allegiant Air",
            "Day"
        ]
    );

    let x = enc.transform(&frame(Carrier::JetBlue)).unwrap();
    assert_eq!(x.shape(), &[1, 5]);
    assert!((x[(0, 0)] - 2.0).abs() < 1e-6, "scaled month = {}", x[(0, 0)]);
    assert_eq!(
        (x[(0, 1)], x[(0, 2)], x[(0, 3)]),
        (0.0, 1.0, 0.0),
        "one-hot block"
    );
    assert_eq!(x[(0, 4)], 5.0);
}

#[test]
fn unknown_category_errors_by_default() {
    let err = encoder("error").transform(&frame(Carrier::Alaska)).unwrap_err();
    assert!(matches!(err, PredictionError::Transform(_)));
    assert!(err.to_string().contains("Alaska Airlines Inc."));
}

#[test]
fn unknown_category_can_be_ignored() {
    let x = encoder("ignore").transform(&frame(Carrier::Alaska)).unwrap();
    assert_eq!((x[(0, 1)], x[(0, 2)], x[(0, 3)]), (0.0, 0.0, 0.0));
}

#[test]
fn missing_column_is_a_transform_error() {
    let enc = ColumnEncoder::from_json_slice(
        br#"{"columns": [{"name": "Origin", "transform": "passthrough"}]}"#,
    )
    .unwrap();
    let err = enc.transform(&frame(Carrier::Delta)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Error preprocessing features: missing column 'Origin'"
    );
}

#[test]
fn category_in_numeric_column_is_rejected() {
    let enc = ColumnEncoder::from_json_slice(
        br#"{"columns": [{"name": "Carrier", "transform": "passthrough"}]}"#,
    )
    .unwrap();
    assert!(enc.transform(&frame(Carrier::Delta)).is_err());
}

#[test]
fn negative_std_is_rejected_at_load() {
    let json = r#"{"columns": [{"name": "Year", "transform": {"standard_scale": {"mean": 0.0, "std": -2.0}}}]}"#;
    let err = ColumnEncoder::from_json_slice(json.as_bytes()).unwrap_err();
    assert!(err.contains("negative std"), "{}", err);

    let zero = r#"{"columns": [{"name": "Year", "transform": {"standard_scale": {"mean": 0.0, "std": 0.0}}}]}"#;
    assert!(ColumnEncoder::from_json_slice(zero.as_bytes()).is_ok());
}
