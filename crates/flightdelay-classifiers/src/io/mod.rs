//! IO utilities for batch query files.

pub mod query_csv;

pub use query_csv::{delimiter_for, read_queries, write_predictions, QueryRow};
