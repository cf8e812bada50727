//! Turning predictions into what the user reads.
//!
//! `message` is the single source of the two result strings; `page` lays the
//! form and the result region out as HTML.
pub mod page;

use crate::models::{DelayLabel, Prediction};

pub const DELAYED_MESSAGE: &str =
    "The flight will likely be delayed upon arrival by 15 minutes or more.";
pub const NOT_DELAYED_MESSAGE: &str =
    "The flight will likely not be delayed upon arrival by 15 minutes or more.";

pub fn message(label: DelayLabel) -> &'static str {
    match label {
        DelayLabel::Delayed => DELAYED_MESSAGE,
        DelayLabel::NotDelayed => NOT_DELAYED_MESSAGE,
    }
}

/// One line of console output for a prediction.
pub fn describe(prediction: &Prediction) -> String {
    match prediction.probability {
        Some(p) => format!(
            "{} (probability of delay: {:.1}%)",
            message(prediction.label),
            p * 100.0
        ),
        None => message(prediction.label).to_string(),
    }
}
