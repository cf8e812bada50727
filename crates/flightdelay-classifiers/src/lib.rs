//! flightdelay-classifiers: inference helpers for the flight delay form.
//!
//! This crate loads a pre-fitted column encoder and a pre-trained binary
//! classifier (local file or remote URL), validates a flight query, encodes it
//! into the feature layout the model expects, and maps the predicted label to
//! the message shown to the user.
//!
//! Neither artifact is trained here. Both are consumed through small traits
//! (`Preprocessor`, `ClassifierModel`) so tests and alternative backends can
//! swap them out.
pub mod artifacts;
pub mod calendar;
pub mod config;
pub mod error;
pub mod frame;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod preprocessing;
pub mod query;
pub mod render;

pub use error::PredictionError;
pub use pipeline::InferencePipeline;
pub use query::{Carrier, DepartureTimeBlock, FlightQuery};
