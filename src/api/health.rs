//! Health check endpoints

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::state::AppState;

/// Response for the main health check endpoint
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub model: String,
    pub model_family: String,
    pub uptime_seconds: u64,
}

/// Response for the liveness check
#[derive(Serialize)]
pub struct LivenessResponse {
    pub alive: bool,
}

/// Main health check endpoint
///
/// Reports version, environment, the configured model and uptime. Bedrock
/// has no health API, so connectivity only shows up on real queries.
///
/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.settings.app_version.clone(),
        environment: state.settings.environment.to_string(),
        model: state.settings.model.id().to_string(),
        model_family: state.settings.model.family().to_string(),
        uptime_seconds: state.uptime_seconds(),
    })
}

/// Liveness endpoint
///
/// GET /liveness
pub async fn liveness() -> Json<LivenessResponse> {
    Json(LivenessResponse { alive: true })
}
