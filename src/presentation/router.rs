use std::any::Any;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{StatusCode, header};
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{audio_handler, caption_handler, health_handler};
use crate::presentation::state::AppState;

/// Room for multipart boundaries and part headers on top of the image itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn create_router(state: AppState) -> Router {
    let body_limit = state
        .orchestrator
        .max_upload_bytes()
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/caption", post(caption_handler))
        .route("/audio/{id}", get(audio_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    tracing::error!(panic = detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "application/json")],
        r#"{"error":"Internal server error"}"#,
    )
        .into_response()
}
