//! Multipart helpers for the upload endpoints
//!
//! Both helpers pick the first part with the requested field name, validate
//! its declared content type before reading the body, and enforce the size
//! limit while reading.

use axum::extract::Multipart;
use bytes::{Bytes, BytesMut};
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;
use tubely_core::AppError;
use tubely_processing::{MediaValidator, ValidatedMedia};

use crate::error::multipart_error;

/// Part body held in memory
#[derive(Debug)]
pub struct BufferedPart {
    pub media: ValidatedMedia,
    pub data: Bytes,
}

/// Part body written to a temporary file that is deleted on drop
#[derive(Debug)]
pub struct SpooledPart {
    pub media: ValidatedMedia,
    pub path: TempPath,
    pub size_bytes: u64,
}

fn missing_field(name: &str) -> AppError {
    AppError::BadRequest(format!("Missing form field '{}'", name))
}

fn too_large(max_bytes: usize) -> AppError {
    AppError::PayloadTooLarge(format!(
        "File size exceeds maximum allowed size of {} MB",
        max_bytes / 1024 / 1024
    ))
}

fn empty_file() -> AppError {
    AppError::BadRequest("Uploaded file is empty".to_string())
}

/// Read the part named `name` into memory.
pub async fn read_part(
    mut multipart: Multipart,
    name: &str,
    validator: &MediaValidator,
    max_bytes: usize,
) -> Result<BufferedPart, AppError> {
    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(name) {
            continue;
        }

        let media = validator.validate(field.content_type())?;

        let mut data = BytesMut::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            if data.len() + chunk.len() > max_bytes {
                return Err(too_large(max_bytes));
            }
            data.extend_from_slice(&chunk);
        }

        if data.is_empty() {
            return Err(empty_file());
        }

        return Ok(BufferedPart {
            media,
            data: data.freeze(),
        });
    }

    Err(missing_field(name))
}

/// Stream the part named `name` into a fresh temporary file.
///
/// The file is removed when the returned [`SpooledPart`] is dropped, and on
/// every early return.
pub async fn spool_part(
    mut multipart: Multipart,
    name: &str,
    validator: &MediaValidator,
    max_bytes: usize,
) -> Result<SpooledPart, AppError> {
    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(name) {
            continue;
        }

        let media = validator.validate(field.content_type())?;

        let (file, path) = tempfile::Builder::new()
            .prefix("tubely-upload-")
            .suffix(&format!(".{}", media.extension))
            .tempfile()?
            .into_parts();
        let mut file = tokio::fs::File::from_std(file);

        let mut size_bytes: u64 = 0;
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            size_bytes += chunk.len() as u64;
            if size_bytes > max_bytes as u64 {
                return Err(too_large(max_bytes));
            }
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        if size_bytes == 0 {
            return Err(empty_file());
        }

        tracing::debug!(
            path = %path.display(),
            size_bytes,
            content_type = %media.media_type,
            "Spooled upload to temporary file"
        );

        return Ok(SpooledPart {
            media,
            path,
            size_bytes,
        });
    }

    Err(missing_field(name))
}
