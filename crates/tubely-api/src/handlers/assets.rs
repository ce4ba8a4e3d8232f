//! Serves objects from the local backend behind signed URLs.

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tubely_core::{AppError, ObjectLocation};
use tubely_storage::{SignatureError, SignedQuery};

/// Content type for a stored key, from its extension.
fn content_type_for(key: &str) -> &'static str {
    let ext = key
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "mp4" => "video/mp4",
        "png" => "image/png",
        "jpeg" | "jpg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

#[tracing::instrument(skip(state, query))]
pub async fn serve_asset(
    State(state): State<Arc<AppState>>,
    Path((bucket, key)): Path<(String, String)>,
    query: Result<Query<SignedQuery>, axum::extract::rejection::QueryRejection>,
) -> Result<Response, HttpAppError> {
    let signer = state
        .assets
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Asset not found".to_string()))?;

    let Query(query) =
        query.map_err(|_| AppError::Forbidden("Missing or invalid signature".to_string()))?;

    let location = ObjectLocation::new(bucket, key);
    signer.verify(&location, &query).map_err(|err| match err {
        SignatureError::Invalid => AppError::Forbidden("Invalid signature".to_string()),
        SignatureError::Expired => AppError::Forbidden("Signed URL has expired".to_string()),
    })?;

    let stream = state.media.storage.download_stream(&location).await?;

    let content_type = HeaderValue::from_static(content_type_for(&location.key));

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, HeaderValue::from_static("private, no-store")),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}
