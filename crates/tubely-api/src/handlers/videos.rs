use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::services::{publish, publish_all};
use crate::state::AppState;
use crate::utils::path::VideoId;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tubely_core::models::{CreateVideoRequest, VideoResponse};
use tubely_core::{authorize, Action, AppError, CreateVideoParams};
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/videos",
    tag = "videos",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, description = "Video record created", body = VideoResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid credential", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, user, request), fields(user_id = %user.user_id))]
pub async fn create_video(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateVideoRequest>,
) -> Result<Response, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let record = state
        .media
        .repository
        .create(CreateVideoParams {
            user_id: user.user_id,
            title: request.title,
            description: request.description,
        })
        .await?;

    tracing::info!(video_id = %record.id, "Video record created");

    let response = publish(&state.media, record).await?;
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/videos/{id}",
    tag = "videos",
    params(("id" = uuid::Uuid, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video record with fresh URLs", body = VideoResponse),
        (status = 400, description = "Malformed video ID", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, video_id), fields(video_id = %video_id.0))]
pub async fn get_video(
    video_id: VideoId,
    State(state): State<Arc<AppState>>,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let record = state
        .media
        .repository
        .get(video_id.0)
        .await?
        .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

    Ok(Json(publish(&state.media, record).await?))
}

#[utoipa::path(
    get,
    path = "/api/videos",
    tag = "videos",
    responses(
        (status = 200, description = "The caller's videos, newest first", body = Vec<VideoResponse>),
        (status = 401, description = "Missing or invalid credential", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn list_videos(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<VideoResponse>>, HttpAppError> {
    let records = state.media.repository.list_by_owner(user.user_id).await?;
    Ok(Json(publish_all(&state.media, records).await?))
}

#[utoipa::path(
    delete,
    path = "/api/videos/{id}",
    tag = "videos",
    params(("id" = uuid::Uuid, Path, description = "Video ID")),
    responses(
        (status = 204, description = "Video record deleted"),
        (status = 401, description = "Missing or invalid credential", body = ErrorResponse),
        (status = 403, description = "Caller is not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, video_id, user),
    fields(video_id = %video_id.0, user_id = %user.user_id)
)]
pub async fn delete_video(
    video_id: VideoId,
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, HttpAppError> {
    let repository = &state.media.repository;
    let record = repository
        .get(video_id.0)
        .await?
        .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

    authorize(user.user_id, &record, Action::Delete)?;

    // Concurrent delete between get and delete
    if !repository.delete(record.id).await? {
        return Err(AppError::NotFound("Couldn't find video".to_string()).into());
    }

    tracing::info!("Video record deleted");
    Ok(StatusCode::NO_CONTENT)
}
