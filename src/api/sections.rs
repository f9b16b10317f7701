use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::api::error_response;
use crate::domain::NewSection;
use crate::infrastructure::AppState;
use crate::services::section_service;

#[utoipa::path(
    get,
    path = "/api/sections",
    responses(
        (status = 200, description = "All sections"),
        (status = 502, description = "Remote store error")
    )
)]
pub async fn list_sections(State(state): State<AppState>) -> impl IntoResponse {
    match section_service::list_sections(state.section_repo.as_ref()).await {
        Ok(sections) => Json(json!({
            "total": sections.len(),
            "sections": sections,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!("Failed to list sections: {}", e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/sections",
    responses(
        (status = 201, description = "Section created"),
        (status = 400, description = "Name missing")
    )
)]
pub async fn create_section(
    State(state): State<AppState>,
    Json(payload): Json<NewSection>,
) -> impl IntoResponse {
    match section_service::create_section(state.section_repo.as_ref(), payload).await {
        Ok(section) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Section created!",
                "section": section
            })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}
