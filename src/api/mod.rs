pub mod health;
pub mod sections;
pub mod videos;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;

use crate::domain::DomainError;
use crate::infrastructure::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Videos
        .route(
            "/videos",
            get(videos::list_videos).post(videos::create_video),
        )
        .route("/videos/bulk-delete", post(videos::bulk_delete_videos))
        .route(
            "/videos/:id",
            get(videos::get_video).put(videos::update_video),
        )
        .route("/videos/:id/tags", get(videos::list_video_tags))
        // Sections
        .route(
            "/sections",
            get(sections::list_sections).post(sections::create_section),
        )
        .with_state(state)
}

/// Map a domain error to a JSON error response
pub(crate) fn error_response(e: &DomainError) -> Response {
    let status = match e {
        DomainError::NotFound => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::External(_) => StatusCode::BAD_GATEWAY,
        DomainError::Database(_) | DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, Json(json!({ "error": e.message() }))).into_response()
}
