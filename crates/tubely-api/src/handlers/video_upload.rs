use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::{publish, UploadService};
use crate::state::AppState;
use crate::utils::path::VideoId;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use std::sync::Arc;
use tubely_core::models::VideoResponse;

#[utoipa::path(
    post,
    path = "/api/videos/{id}/video",
    tag = "videos",
    params(("id" = uuid::Uuid, Path, description = "Video ID")),
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Part `video`: video/mp4"),
    responses(
        (status = 200, description = "Video processed and stored", body = VideoResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing credential or not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Processing or storage failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_video(
    video_id: VideoId,
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let record = UploadService::new(&state.media)
        .upload_video(user.user_id, video_id.0, multipart)
        .await?;

    tracing::info!(
        video_id = %record.id,
        user_id = %user.user_id,
        "Video upload completed"
    );

    Ok(Json(publish(&state.media, record).await?))
}
