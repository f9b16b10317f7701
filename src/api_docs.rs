use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::videos::list_videos,
        api::videos::get_video,
        api::videos::list_video_tags,
        api::videos::create_video,
        api::videos::update_video,
        api::videos::bulk_delete_videos,
        api::sections::list_sections,
        api::sections::create_section,
    ),
    tags(
        (name = "video-catalog", description = "Video catalog admin API")
    )
)]
pub struct ApiDoc;
