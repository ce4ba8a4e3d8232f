//! Ownership guard for mutating operations on video records.

use uuid::Uuid;

use crate::error::AppError;
use crate::models::VideoRecord;

/// Mutating operation a caller wants to perform on a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    UploadThumbnail,
    UploadVideo,
    Delete,
}

/// Allow the action only when `caller_id` owns `record`.
///
/// Upload attempts by a non-owner are `Unauthorized`, delete attempts are
/// `Forbidden`. Must run before any storage or metadata write.
pub fn authorize(caller_id: Uuid, record: &VideoRecord, action: Action) -> Result<(), AppError> {
    if record.is_owned_by(caller_id) {
        return Ok(());
    }

    tracing::warn!(
        video_id = %record.id,
        caller_id = %caller_id,
        action = ?action,
        "Rejected non-owner operation"
    );

    match action {
        Action::UploadThumbnail | Action::UploadVideo => Err(AppError::Unauthorized(
            "User is not the video owner".to_string(),
        )),
        Action::Delete => Err(AppError::Forbidden(
            "You can't delete this video".to_string(),
        )),
    }
}
