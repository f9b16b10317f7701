//! Video API handlers using the repository pattern

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::error_response;
use crate::domain::VideoId;
use crate::infrastructure::AppState;
use crate::services::{SaveMode, SaveOutcome, VideoDraft};

#[utoipa::path(
    get,
    path = "/api/videos",
    responses(
        (status = 200, description = "All videos, newest id first"),
        (status = 502, description = "Remote store error")
    )
)]
pub async fn list_videos(State(state): State<AppState>) -> impl IntoResponse {
    match state.video_repo.find_all().await {
        Ok(videos) => Json(json!({
            "total": videos.len(),
            "videos": videos,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!("Failed to list videos: {}", e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/videos/{id}",
    params(("id" = i64, Path, description = "Video id")),
    responses(
        (status = 200, description = "Video with its tags and section ids"),
        (status = 404, description = "Video not found")
    )
)]
pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<VideoId>,
) -> impl IntoResponse {
    match state.videos.load_for_edit(id).await {
        Ok(editable) => Json(json!({
            "video": editable.video,
            "tags": editable.tags,
            "section_ids": editable.section_ids,
        }))
        .into_response(),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    get,
    path = "/api/videos/{id}/tags",
    params(("id" = i64, Path, description = "Video id")),
    responses(
        (status = 200, description = "Tags of one video")
    )
)]
pub async fn list_video_tags(
    State(state): State<AppState>,
    Path(id): Path<VideoId>,
) -> impl IntoResponse {
    match state.videos.tags_for(id).await {
        Ok(tags) => Json(json!({ "video_id": id, "tags": tags })).into_response(),
        Err(e) => {
            tracing::error!("Failed to load tags for video {}: {}", id, e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/videos",
    responses(
        (status = 201, description = "Video created; `warnings` lists relation syncs that failed"),
        (status = 400, description = "Title or video reference missing"),
        (status = 502, description = "Remote store rejected the video")
    )
)]
pub async fn create_video(
    State(state): State<AppState>,
    Json(draft): Json<VideoDraft>,
) -> impl IntoResponse {
    match state.videos.save(SaveMode::Add, &draft).await {
        Ok(outcome) => saved_response(StatusCode::CREATED, outcome),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    put,
    path = "/api/videos/{id}",
    params(("id" = i64, Path, description = "Video id")),
    responses(
        (status = 200, description = "Video updated; `warnings` lists relation syncs that failed"),
        (status = 400, description = "Title or video reference missing"),
        (status = 404, description = "Video not found")
    )
)]
pub async fn update_video(
    State(state): State<AppState>,
    Path(id): Path<VideoId>,
    Json(draft): Json<VideoDraft>,
) -> impl IntoResponse {
    match state.videos.save(SaveMode::Edit(id), &draft).await {
        Ok(outcome) => saved_response(StatusCode::OK, outcome),
        Err(e) => error_response(&e),
    }
}

fn saved_response(status: StatusCode, outcome: SaveOutcome) -> axum::response::Response {
    let message = if outcome.is_partial() {
        outcome
            .warnings
            .iter()
            .map(|w| w.message.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        "Video saved".to_string()
    };

    (
        status,
        Json(json!({
            "message": message,
            "video": outcome.video,
            "warnings": outcome.warnings,
        })),
    )
        .into_response()
}

/// Request DTO for deleting the selected rows
#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<VideoId>,
}

#[utoipa::path(
    post,
    path = "/api/videos/bulk-delete",
    responses(
        (status = 200, description = "Number of videos deleted")
    )
)]
pub async fn bulk_delete_videos(
    State(state): State<AppState>,
    Json(payload): Json<BulkDeleteRequest>,
) -> impl IntoResponse {
    match state.videos.bulk_delete(&payload.ids).await {
        Ok(report) => Json(json!(report)).into_response(),
        Err(e) => error_response(&e),
    }
}
