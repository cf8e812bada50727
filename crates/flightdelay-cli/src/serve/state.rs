use std::sync::Arc;

use flightdelay_classifiers::InferencePipeline;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Artifacts loaded once at startup, read-only afterwards
    pub pipeline: Arc<InferencePipeline>,
    /// Years offered by the form
    pub years: Arc<Vec<i32>>,
    pub version: Arc<str>,
}

impl AppState {
    pub fn new(pipeline: InferencePipeline, years: Vec<i32>, version: &str) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            years: Arc::new(years),
            version: Arc::from(version),
        }
    }
}
