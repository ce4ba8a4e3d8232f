use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::location::ObjectLocation;

/// Reference to a video's thumbnail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailRef {
    /// Bytes kept in the metadata store alongside the record
    Inline { content_type: String, data: Vec<u8> },
    /// Object in blob storage, signed on read
    Stored(ObjectLocation),
}

impl ThumbnailRef {
    pub fn content_type(&self) -> Option<&str> {
        match self {
            ThumbnailRef::Inline { content_type, .. } => Some(content_type),
            ThumbnailRef::Stored(_) => None,
        }
    }
}

/// Metadata record correlating an owner with at most one stored video and
/// one thumbnail.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub video: Option<ObjectLocation>,
    pub thumbnail: Option<ThumbnailRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoRecord {
    /// Build a fresh record for `params`. The id is generated here and never changes.
    pub fn new(params: CreateVideoParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: params.user_id,
            title: params.title,
            description: params.description,
            video: None,
            thumbnail: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Input for creating a record in the metadata store
#[derive(Debug, Clone)]
pub struct CreateVideoParams {
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
}

/// Request DTO for creating a new video record
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateVideoRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Title must be between 1 and 255 characters"
    ))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,
}

/// Video record as returned to clients, with freshly resolved URLs
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VideoResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Time-limited signed URL; minted on every read
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
