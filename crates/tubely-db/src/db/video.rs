use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres};
use tubely_core::{AppError, CreateVideoParams, ObjectLocation, ThumbnailRef, VideoRecord};
use uuid::Uuid;

const VIDEO_COLUMNS: &str = "id, user_id, title, description, video_bucket, video_key, \
     thumbnail_content_type, thumbnail_data, thumbnail_bucket, thumbnail_key, \
     created_at, updated_at";

/// Metadata store for video records
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Insert a new record owned by `params.user_id`
    async fn create(&self, params: CreateVideoParams) -> Result<VideoRecord, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError>;

    /// Persist the record's references and descriptive fields.
    ///
    /// Returns the stored row with a refreshed `updated_at`, or `NotFound`
    /// when the record no longer exists.
    async fn update(&self, record: &VideoRecord) -> Result<VideoRecord, AppError>;

    /// Replace only the video reference, leaving the thumbnail untouched
    async fn set_video_location(
        &self,
        id: Uuid,
        location: &ObjectLocation,
    ) -> Result<VideoRecord, AppError>;

    /// Replace only the thumbnail columns, leaving the video untouched
    async fn set_thumbnail(
        &self,
        id: Uuid,
        thumbnail: &ThumbnailRef,
    ) -> Result<VideoRecord, AppError>;

    /// Returns false when nothing was deleted
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// Records owned by `user_id`, newest first
    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<VideoRecord>, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

#[derive(Debug, FromRow)]
struct VideoRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    description: Option<String>,
    video_bucket: Option<String>,
    video_key: Option<String>,
    thumbnail_content_type: Option<String>,
    thumbnail_data: Option<Vec<u8>>,
    thumbnail_bucket: Option<String>,
    thumbnail_key: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<VideoRow> for VideoRecord {
    fn from(row: VideoRow) -> Self {
        let video = match (row.video_bucket, row.video_key) {
            (Some(bucket), Some(key)) => Some(ObjectLocation { bucket, key }),
            _ => None,
        };

        let thumbnail = match (
            row.thumbnail_bucket,
            row.thumbnail_key,
            row.thumbnail_data,
            row.thumbnail_content_type,
        ) {
            (Some(bucket), Some(key), _, _) => Some(ThumbnailRef::Stored(ObjectLocation { bucket, key })),
            (_, _, Some(data), Some(content_type)) => Some(ThumbnailRef::Inline { content_type, data }),
            _ => None,
        };

        VideoRecord {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            video,
            thumbnail,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Column values for the thumbnail variant of a record
struct ThumbnailColumns<'a> {
    content_type: Option<&'a str>,
    data: Option<&'a [u8]>,
    bucket: Option<&'a str>,
    key: Option<&'a str>,
}

impl<'a> ThumbnailColumns<'a> {
    fn from_ref(thumbnail: Option<&'a ThumbnailRef>) -> Self {
        match thumbnail {
            Some(ThumbnailRef::Inline { content_type, data }) => Self {
                content_type: Some(content_type),
                data: Some(data),
                bucket: None,
                key: None,
            },
            Some(ThumbnailRef::Stored(location)) => Self {
                content_type: None,
                data: None,
                bucket: Some(&location.bucket),
                key: Some(&location.key),
            },
            None => Self {
                content_type: None,
                data: None,
                bucket: None,
                key: None,
            },
        }
    }
}

fn updated_row(row: Option<VideoRow>) -> Result<VideoRecord, AppError> {
    row.map(VideoRecord::from)
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))
}

/// Postgres-backed [`VideoRepository`]
#[derive(Clone)]
pub struct PostgresVideoRepository {
    pool: PgPool,
}

impl PostgresVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRepository for PostgresVideoRepository {
    #[tracing::instrument(skip(self, params), fields(db.table = "videos", db.operation = "insert", user_id = %params.user_id))]
    async fn create(&self, params: CreateVideoParams) -> Result<VideoRecord, AppError> {
        let record = VideoRecord::new(params);

        let row = sqlx::query_as::<Postgres, VideoRow>(&format!(
            r#"
            INSERT INTO videos (id, user_id, title, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            VIDEO_COLUMNS
        ))
        .bind(record.id)
        .bind(record.user_id)
        .bind(&record.title)
        .bind(&record.description)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(video_id = %row.id, "Video record created");
        Ok(row.into())
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select", db.record_id = %id))]
    async fn get(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError> {
        let row = sqlx::query_as::<Postgres, VideoRow>(&format!(
            "SELECT {} FROM videos WHERE id = $1",
            VIDEO_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(VideoRecord::from))
    }

    #[tracing::instrument(skip(self, record), fields(db.table = "videos", db.operation = "update", db.record_id = %record.id))]
    async fn update(&self, record: &VideoRecord) -> Result<VideoRecord, AppError> {
        let thumbnail = ThumbnailColumns::from_ref(record.thumbnail.as_ref());

        let row = sqlx::query_as::<Postgres, VideoRow>(&format!(
            r#"
            UPDATE videos
            SET title = $2,
                description = $3,
                video_bucket = $4,
                video_key = $5,
                thumbnail_content_type = $6,
                thumbnail_data = $7,
                thumbnail_bucket = $8,
                thumbnail_key = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            VIDEO_COLUMNS
        ))
        .bind(record.id)
        .bind(&record.title)
        .bind(&record.description)
        .bind(record.video.as_ref().map(|v| v.bucket.as_str()))
        .bind(record.video.as_ref().map(|v| v.key.as_str()))
        .bind(thumbnail.content_type)
        .bind(thumbnail.data)
        .bind(thumbnail.bucket)
        .bind(thumbnail.key)
        .fetch_optional(&self.pool)
        .await?;

        updated_row(row)
    }

    #[tracing::instrument(skip(self, location), fields(db.table = "videos", db.operation = "update", db.record_id = %id))]
    async fn set_video_location(
        &self,
        id: Uuid,
        location: &ObjectLocation,
    ) -> Result<VideoRecord, AppError> {
        let row = sqlx::query_as::<Postgres, VideoRow>(&format!(
            r#"
            UPDATE videos
            SET video_bucket = $2,
                video_key = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            VIDEO_COLUMNS
        ))
        .bind(id)
        .bind(&location.bucket)
        .bind(&location.key)
        .fetch_optional(&self.pool)
        .await?;

        updated_row(row)
    }

    #[tracing::instrument(skip(self, thumbnail), fields(db.table = "videos", db.operation = "update", db.record_id = %id))]
    async fn set_thumbnail(
        &self,
        id: Uuid,
        thumbnail: &ThumbnailRef,
    ) -> Result<VideoRecord, AppError> {
        let columns = ThumbnailColumns::from_ref(Some(thumbnail));

        let row = sqlx::query_as::<Postgres, VideoRow>(&format!(
            r#"
            UPDATE videos
            SET thumbnail_content_type = $2,
                thumbnail_data = $3,
                thumbnail_bucket = $4,
                thumbnail_key = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            VIDEO_COLUMNS
        ))
        .bind(id)
        .bind(columns.content_type)
        .bind(columns.data)
        .bind(columns.bucket)
        .bind(columns.key)
        .fetch_optional(&self.pool)
        .await?;

        updated_row(row)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select", user_id = %user_id))]
    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<VideoRecord>, AppError> {
        let rows = sqlx::query_as::<Postgres, VideoRow>(&format!(
            "SELECT {} FROM videos WHERE user_id = $1 ORDER BY created_at DESC, id",
            VIDEO_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(VideoRecord::from).collect())
    }

    #[tracing::instrument(skip(self), fields(db.operation = "ping"))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
