//! `flightdelay serve`: the prediction form over HTTP.
//!
//! Artifacts are loaded outside any async task, so a slow or failed
//! download delays startup but never blocks a request. A failed load still
//! serves the page, with the error shown above the form.
pub mod error;
pub mod handlers;
pub mod state;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use log::info;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::predict::build_pipeline;

pub use error::{ApiError, AppError};
pub use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/predict", post(handlers::predict_form))
        .route("/api/predict", post(handlers::predict_json))
        .route("/health", get(handlers::health_check))
        .fallback(handlers::not_found)
        .with_state(state)
}

/// Bind `host:port`. `host` may be an IP literal or a name such as `localhost`.
pub async fn bind(host: &str, port: u16) -> Result<TcpListener> {
    TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))
}

/// Bind, load the artifacts, and serve until the process is stopped.
///
/// The address is bound before any artifact is fetched.
pub fn run_server(config: &AppConfig) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    let listener = runtime.block_on(bind(&config.host, config.port))?;
    let addr = listener
        .local_addr()
        .context("Failed to read the bound address")?;

    let pipeline = build_pipeline(config)?;
    let state = AppState::new(pipeline, config.years.clone(), &config.version);
    let app = create_router(state);

    runtime.block_on(async move {
        info!("[FlightDelay::Serve] Listening on http://{}", addr);
        axum::serve(listener, app).await.context("Server error")
    })
}
