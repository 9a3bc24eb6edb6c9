use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::presentation::handlers::error::ApiError;
use crate::presentation::state::AppState;

pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

#[tracing::instrument(skip(state))]
pub async fn audio_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.orchestrator.fetch_artifact(&id).await {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, AUDIO_CONTENT_TYPE)],
            bytes,
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
