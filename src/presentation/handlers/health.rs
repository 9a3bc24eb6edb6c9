use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub pending_expiries: usize,
}

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            pending_expiries: state.orchestrator.scheduler().pending(),
        }),
    )
}
