use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub backend: &'static str,
}

/// `GET /health`: 200 when the primary store answers, 503 otherwise.
pub async fn check(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let backend = state.backend_name();
    if state.storage_healthy().await {
        (StatusCode::OK, Json(HealthReport { status: "ok", backend }))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthReport { status: "unavailable", backend }),
        )
    }
}
