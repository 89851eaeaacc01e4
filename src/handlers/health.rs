//! Liveness and readiness endpoints

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    store: String,
    version: String,
}

/// GET /
pub async fn root() -> &'static str {
    "rmauth API Server"
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, store) = match state.store.health_check().await {
        Ok(()) => ("healthy", "connected".to_string()),
        Err(e) => ("unhealthy", format!("error: {}", e)),
    };

    Json(HealthResponse {
        status: status.to_string(),
        store,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
