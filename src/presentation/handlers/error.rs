use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::services::{ErrorKind, OrchestratorError};

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// The only error shape clients ever see.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: INTERNAL_MESSAGE.to_string(),
        }
    }
}

impl From<OrchestratorError> for ApiError {
    fn from(err: OrchestratorError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => {
                tracing::warn!(error = %err, "Rejected upload");
                Self::bad_request(err.to_string())
            }
            ErrorKind::NotFound => {
                tracing::warn!(error = %err, "Artifact not found");
                Self {
                    status: StatusCode::NOT_FOUND,
                    message: "Audio file not found".to_string(),
                }
            }
            ErrorKind::GenerationFailure => {
                tracing::error!(error = ?err, "Caption or audio generation failed");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "Failed to generate caption audio".to_string(),
                }
            }
            ErrorKind::StorageError => {
                tracing::error!(error = ?err, "Artifact storage failed");
                Self::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}
