use std::io::Cursor;
use std::time::Instant;

use axum::extract::multipart::{Multipart, MultipartRejection};
use tubely_core::{
    authorize, Action, AppError, ObjectLocation, ThumbnailRef, ThumbnailStorageMode, VideoRecord,
};
use tubely_processing::MediaValidator;
use tubely_storage::keys::{generate_video_key, thumbnail_key};
use uuid::Uuid;

use crate::constants::{THUMBNAIL_FIELD, VIDEO_FIELD};
use crate::error::multipart_rejection;
use crate::state::MediaState;
use crate::utils::upload::{read_part, spool_part};

/// Upload orchestrator for thumbnails and videos.
///
/// Each upload runs strictly in order:
/// 1. Load the record (`NotFound`)
/// 2. Ownership check (`Unauthorized`)
/// 3. Parse the body and extract the named part (`BadRequest`, `PayloadTooLarge`)
/// 4. Validate its content type (`InvalidMediaType`)
/// 5. Video only: spool to a temp file, remux for fast start, probe orientation
/// 6. Compute the storage key
/// 7. Put the bytes into the object store
/// 8. Persist the new reference
///
/// Nothing reaches durable storage before step 7, and every temporary file
/// is released on all exit paths.
pub struct UploadService<'a> {
    media: &'a MediaState,
}

impl<'a> UploadService<'a> {
    pub fn new(media: &'a MediaState) -> Self {
        Self { media }
    }

    async fn load_authorized(
        &self,
        caller_id: Uuid,
        video_id: Uuid,
        action: Action,
    ) -> Result<VideoRecord, AppError> {
        let record = self
            .media
            .repository
            .get(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

        authorize(caller_id, &record, action)?;
        Ok(record)
    }

    #[tracing::instrument(
        skip(self, caller_id, video_id, multipart),
        fields(video_id = %video_id, user_id = %caller_id)
    )]
    pub async fn upload_thumbnail(
        &self,
        caller_id: Uuid,
        video_id: Uuid,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<VideoRecord, AppError> {
        let record = self
            .load_authorized(caller_id, video_id, Action::UploadThumbnail)
            .await?;
        let multipart = multipart.map_err(multipart_rejection)?;

        let part = read_part(
            multipart,
            THUMBNAIL_FIELD,
            &MediaValidator::thumbnail(),
            self.media.limits.max_thumbnail_bytes,
        )
        .await?;

        let (thumbnail, stored) = match self.media.thumbnail_mode {
            ThumbnailStorageMode::Inline => (
                ThumbnailRef::Inline {
                    content_type: part.media.media_type,
                    data: part.data.to_vec(),
                },
                None,
            ),
            ThumbnailStorageMode::Object => {
                let storage = &self.media.storage;
                let key = thumbnail_key(record.id, &part.media.extension);
                let size_bytes = part.data.len() as u64;
                let location = storage
                    .put(
                        storage.default_bucket(),
                        &key,
                        &part.media.media_type,
                        Some(size_bytes),
                        Box::pin(Cursor::new(part.data)),
                    )
                    .await?;
                (ThumbnailRef::Stored(location.clone()), Some(location))
            }
        };

        let saved = self
            .media
            .repository
            .set_thumbnail(record.id, &thumbnail)
            .await;
        persisted(record.id, saved, stored.as_ref())
    }

    #[tracing::instrument(
        skip(self, caller_id, video_id, multipart),
        fields(video_id = %video_id, user_id = %caller_id)
    )]
    pub async fn upload_video(
        &self,
        caller_id: Uuid,
        video_id: Uuid,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<VideoRecord, AppError> {
        let record = self
            .load_authorized(caller_id, video_id, Action::UploadVideo)
            .await?;
        let multipart = multipart.map_err(multipart_rejection)?;

        let upload = spool_part(
            multipart,
            VIDEO_FIELD,
            &MediaValidator::video(),
            self.media.limits.max_video_bytes,
        )
        .await?;

        let started = Instant::now();
        let optimized = self.media.optimizer.optimize(&upload.path).await?;
        let orientation = self.media.inspector.orientation(&optimized).await?;
        tracing::info!(
            orientation = %orientation,
            size_bytes = upload.size_bytes,
            duration_ms = started.elapsed().as_millis() as u64,
            "Processed uploaded video"
        );

        let key = generate_video_key(orientation, &upload.media.extension);
        let file = tokio::fs::File::open(&optimized).await?;
        let size_bytes = file.metadata().await?.len();

        let storage = &self.media.storage;
        let location = storage
            .put(
                storage.default_bucket(),
                &key,
                &upload.media.media_type,
                Some(size_bytes),
                Box::pin(file),
            )
            .await?;

        let saved = self
            .media
            .repository
            .set_video_location(record.id, &location)
            .await;
        persisted(record.id, saved, Some(&location))
    }
}

/// Map a record write failure. A failure here leaves `stored` without a reference.
fn persisted(
    video_id: Uuid,
    saved: Result<VideoRecord, AppError>,
    stored: Option<&ObjectLocation>,
) -> Result<VideoRecord, AppError> {
    saved.map_err(|err| {
        if let Some(location) = stored {
            tracing::warn!(
                video_id = %video_id,
                bucket = %location.bucket,
                key = %location.key,
                "Stored object is orphaned after failed record update"
            );
        }
        match err {
            AppError::NotFound(msg) => AppError::NotFound(msg),
            other => AppError::InternalWithSource {
                message: "Couldn't update video".to_string(),
                source: anyhow::Error::new(other),
            },
        }
    })
}
