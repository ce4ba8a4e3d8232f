//! Media validator for uploaded parts
//!
//! Checks a part's declared content type against an endpoint allow-list and
//! derives the file extension used in storage keys.

use mime::Mime;
use thiserror::Error;
use tubely_core::AppError;

/// Content types accepted for thumbnails
pub const THUMBNAIL_TYPES: &[&str] = &["image/jpeg", "image/png"];

/// Content types accepted for videos
pub const VIDEO_TYPES: &[&str] = &["video/mp4"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing Content-Type for file")]
    MissingContentType,

    #[error("Invalid Content-Type: {0}")]
    Unparseable(String),

    #[error("Invalid file type: {0}")]
    NotAllowed(String),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::InvalidMediaType(err.to_string())
    }
}

/// Normalized media type (parameters stripped) and its extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedMedia {
    pub media_type: String,
    pub extension: String,
}

#[derive(Debug, Clone)]
pub struct MediaValidator {
    allowed: &'static [&'static str],
}

impl MediaValidator {
    pub fn new(allowed: &'static [&'static str]) -> Self {
        Self { allowed }
    }

    pub fn thumbnail() -> Self {
        Self::new(THUMBNAIL_TYPES)
    }

    pub fn video() -> Self {
        Self::new(VIDEO_TYPES)
    }

    pub fn allowed(&self) -> &[&'static str] {
        self.allowed
    }

    /// Validate a declared content type.
    ///
    /// Parameters such as `; charset=` are ignored and the comparison is case
    /// insensitive. The extension is the subtype, so `image/jpeg` yields `jpeg`.
    pub fn validate(&self, content_type: Option<&str>) -> Result<ValidatedMedia, ValidationError> {
        let raw = content_type
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ValidationError::MissingContentType)?;

        let parsed: Mime = raw
            .parse()
            .map_err(|_| ValidationError::Unparseable(raw.to_string()))?;

        let media_type = parsed.essence_str().to_ascii_lowercase();
        if !self
            .allowed
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&media_type))
        {
            return Err(ValidationError::NotAllowed(media_type));
        }

        Ok(ValidatedMedia {
            extension: parsed.subtype().as_str().to_ascii_lowercase(),
            media_type,
        })
    }
}
