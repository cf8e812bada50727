//! Route handlers for the form page and the JSON API.
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Html,
    Form, Json,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use flightdelay_classifiers::error::ArtifactKind;
use flightdelay_classifiers::models::Prediction;
use flightdelay_classifiers::render::message;
use flightdelay_classifiers::render::page::{render_page, FormPage, FormState};
use flightdelay_classifiers::{Carrier, DepartureTimeBlock, FlightQuery, PredictionError};

use super::error::{ApiError, AppError};
use crate::predict::predict_one;
use super::state::AppState;

pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Body of `POST /api/predict`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiQuery {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub dep_time_block: String,
    pub carrier: String,
}

impl ApiQuery {
    fn to_query(&self) -> Result<FlightQuery, PredictionError> {
        let block: DepartureTimeBlock = self.dep_time_block.parse()?;
        let carrier: Carrier = self.carrier.parse()?;
        FlightQuery::new(self.year, self.month, self.day, block, carrier)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub label: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<f32>,
    pub message: String,
}

impl From<Prediction> for PredictResponse {
    fn from(p: Prediction) -> Self {
        Self {
            label: p.label.as_u8(),
            probability: p.probability,
            message: message(p.label).to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` when both artifacts are loaded, `degraded` otherwise
    pub status: String,
    pub version: String,
    pub preprocessor: String,
    pub model: String,
    pub errors: Vec<String>,
}

fn submit(state: &AppState, query: Result<FlightQuery, PredictionError>) -> Result<Prediction, PredictionError> {
    let query = query?;
    let prediction = predict_one(&state.pipeline, &state.years, &query)?;
    info!(
        "[FlightDelay::Serve] {}-{:02}-{:02} {} {} -> {}",
        query.year(),
        query.month(),
        query.day(),
        query.departure_time_block(),
        query.carrier(),
        prediction.label
    );
    Ok(prediction)
}

/// GET /
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let page = FormPage {
        years: &state.years,
        state: None,
        outcome: None,
        load_errors: state.pipeline.load_errors(),
    };
    Html(render_page(&page).into_string())
}

/// POST /predict
///
/// Form submission. Always answers with the page; failures show in the
/// result region.
pub async fn predict_form(State(state): State<AppState>, Form(form): Form<FormState>) -> Html<String> {
    let outcome = submit(&state, form.to_query());
    if let Err(e) = &outcome {
        debug!("[FlightDelay::Serve] Submission rejected: {}", e);
    }
    let page = FormPage {
        years: &state.years,
        state: Some(&form),
        outcome: Some(&outcome),
        load_errors: state.pipeline.load_errors(),
    };
    Html(render_page(&page).into_string())
}

/// POST /api/predict
pub async fn predict_json(
    State(state): State<AppState>,
    body: Result<Json<ApiQuery>, JsonRejection>,
) -> HandlerResult<PredictResponse> {
    let Json(body) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let prediction = submit(&state, body.to_query())?;
    Ok(Json(prediction.into()))
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let artifacts = state.pipeline.artifacts();
    Json(HealthResponse {
        status: if artifacts.is_ready() { "ok" } else { "degraded" }.to_string(),
        version: state.version.to_string(),
        preprocessor: artifacts.status(ArtifactKind::Preprocessor).to_string(),
        model: artifacts.status(ArtifactKind::Model).to_string(),
        errors: state
            .pipeline
            .load_errors()
            .iter()
            .map(|e| e.to_string())
            .collect(),
    })
}

/// Fallback for unknown routes.
pub async fn not_found() -> (axum::http::StatusCode, Json<ApiError>) {
    (
        axum::http::StatusCode::NOT_FOUND,
        Json(ApiError::new("NOT_FOUND", "No such route").with_details("See GET / for the form")),
    )
}
