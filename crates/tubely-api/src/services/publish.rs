//! Turning stored records into client responses.
//!
//! Persisted references are `{bucket, key}` pairs; URLs are minted here on
//! every read so no expiring credential is ever stored.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tubely_core::models::VideoResponse;
use tubely_core::{AppError, ThumbnailRef, VideoRecord};

use crate::state::MediaState;

/// Resolve a record's references into fresh URLs.
pub async fn publish(media: &MediaState, record: VideoRecord) -> Result<VideoResponse, AppError> {
    let video_url = match &record.video {
        Some(location) => Some(
            media
                .storage
                .presign_get(location, media.presign_ttl)
                .await?,
        ),
        None => None,
    };

    let thumbnail_url = match &record.thumbnail {
        Some(ThumbnailRef::Inline { content_type, data }) => Some(data_url(content_type, data)),
        Some(ThumbnailRef::Stored(location)) => Some(
            media
                .storage
                .presign_get(location, media.presign_ttl)
                .await?,
        ),
        None => None,
    };

    Ok(VideoResponse {
        id: record.id,
        user_id: record.user_id,
        title: record.title,
        description: record.description,
        video_url,
        thumbnail_url,
        created_at: record.created_at,
        updated_at: record.updated_at,
    })
}

pub async fn publish_all(
    media: &MediaState,
    records: Vec<VideoRecord>,
) -> Result<Vec<VideoResponse>, AppError> {
    let mut responses = Vec::with_capacity(records.len());
    for record in records {
        responses.push(publish(media, record).await?);
    }
    Ok(responses)
}

fn data_url(content_type: &str, data: &[u8]) -> String {
    format!("data:{};base64,{}", content_type, STANDARD.encode(data))
}
