use axum::Json;
use axum::extract::multipart::{Field, MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::{Bytes, BytesMut};
use serde::Serialize;

use crate::domain::UploadedImage;
use crate::presentation::handlers::error::ApiError;
use crate::presentation::state::AppState;

const IMAGE_FIELD_NAMES: [&str; 3] = ["image", "image_file", "file"];

#[derive(Serialize)]
pub struct CaptionResponse {
    pub caption: String,
    pub audio_url: String,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn caption_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Caption request is not multipart");
            return ApiError::bad_request(rejection.body_text()).into_response();
        }
    };

    let limit = state.orchestrator.max_upload_bytes();

    let upload = match read_image_upload(multipart, limit).await {
        Ok(Some(upload)) => upload,
        Ok(None) => {
            tracing::warn!("Caption request with no image");
            return ApiError::bad_request("No image provided").into_response();
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read multipart");
            return ApiError::bad_request(format!("Failed to read upload: {}", e.body_text()))
                .into_response();
        }
    };

    match state.orchestrator.narrate(upload).await {
        Ok(result) => (
            StatusCode::OK,
            Json(CaptionResponse {
                caption: result.caption.into_inner(),
                audio_url: result.audio_url,
            }),
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Finds the image part and reads at most `limit` bytes of it. Reading stops
/// as soon as the part is known to be oversized.
async fn read_image_upload(
    mut multipart: Multipart,
    limit: usize,
) -> Result<Option<UploadedImage>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if !is_image_field(&field) {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let (data, declared_size) = read_bounded(field, limit).await?;

        tracing::debug!(
            filename = filename.as_deref().unwrap_or("unknown"),
            declared_size,
            "Image field received"
        );

        return Ok(Some(UploadedImage::truncated(filename, data, declared_size)));
    }

    Ok(None)
}

fn is_image_field(field: &Field<'_>) -> bool {
    field.file_name().is_some()
        || field
            .name()
            .is_some_and(|name| IMAGE_FIELD_NAMES.contains(&name))
}

async fn read_bounded(mut field: Field<'_>, limit: usize) -> Result<(Bytes, u64), MultipartError> {
    let mut buffer = BytesMut::new();
    let mut seen: u64 = 0;

    while let Some(chunk) = field.chunk().await? {
        seen += chunk.len() as u64;
        if seen > limit as u64 {
            break;
        }
        buffer.extend_from_slice(&chunk);
    }

    Ok((buffer.freeze(), seen))
}
