use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{info, warn};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::config::Config;
use crate::data::{TimetableRequest, TimetableResponse};
use crate::error::SchedulerError;
use crate::solver;
use crate::store::{Catalog, RecordSource};

/// Shared state for the handlers.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn RecordSource + Send + Sync>,
}

/// Records and request posted together to the stateless endpoint.
#[derive(Debug, Deserialize)]
pub struct SolveInput {
    pub catalog: Catalog,
    pub request: TimetableRequest,
}

async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "Timetable Solver API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "healthy"
    }))
}

async fn health_handler() -> Json<Value> {
    Json(json!({"status": "healthy", "service": "timetable-solver"}))
}

async fn timetable_health_handler() -> Json<Value> {
    Json(json!({"status": "healthy", "service": "timetable"}))
}

async fn generate_handler(
    State(state): State<AppState>,
    Json(request): Json<TimetableRequest>,
) -> Result<Json<TimetableResponse>, SchedulerError> {
    let allocation = solver::generate(state.source.as_ref(), &request).inspect_err(|e| {
        warn!("Timetable generation for {:?} failed: {e}", request.batch_ids);
    })?;
    Ok(Json(allocation.into_response()))
}

/// Unlike `/generate`, a body that does not decode still gets a
/// `TimetableResponse`, since the catalog travels in the body too.
async fn solve_handler(
    payload: Result<Json<SolveInput>, JsonRejection>,
) -> Result<Json<TimetableResponse>, SchedulerError> {
    let Json(input) = payload.map_err(|rejection| {
        warn!("Rejected inline solve body: {rejection}");
        SchedulerError::InvalidRequest(rejection.body_text())
    })?;
    let allocation = solver::generate(&input.catalog, &input.request).inspect_err(|e| {
        warn!("Inline timetable solve failed: {e}");
    })?;
    Ok(Json(allocation.into_response()))
}

pub fn build_router(source: Arc<dyn RecordSource + Send + Sync>) -> Router {
    let timetable_routes = Router::new()
        .route("/generate", post(generate_handler))
        .route("/solve", post(solve_handler))
        .route("/health", get(timetable_health_handler))
        .with_state(AppState { source });

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .nest("/v1/timetable", timetable_routes)
}

pub async fn run_server(
    config: &Config,
    source: Arc<dyn RecordSource + Send + Sync>,
) -> std::io::Result<()> {
    let app = build_router(source);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}
