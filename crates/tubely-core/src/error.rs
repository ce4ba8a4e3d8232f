//! Error types module
//!
//! All failures of the upload-and-publish pipeline are unified under
//! [`AppError`]. Each variant self-describes how it is presented to clients
//! through [`ErrorMetadata`].
//!
//! The `Database` variant carries a `sqlx::Error` when the `sqlx` feature is
//! enabled and a plain message otherwise.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Severity an error is logged at when it reaches the HTTP layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Caller mistakes: bad input, unknown ids, bad tokens
    Debug,
    /// Authenticated callers touching records they do not own
    Warn,
    /// Our own failures: tools, storage, database
    Error,
}

/// How an error is rendered to clients and operators
pub trait ErrorMetadata {
    fn http_status_code(&self) -> u16;

    /// Stable code clients can branch on, e.g. `INVALID_MEDIA_TYPE`
    fn error_code(&self) -> &'static str;

    /// Retrying the same request may succeed
    fn is_recoverable(&self) -> bool;

    fn suggested_action(&self) -> Option<&'static str>;

    /// Message safe to show to the caller
    fn client_message(&self) -> String;

    /// Internal details must not leave the service
    fn is_sensitive(&self) -> bool;

    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Invalid media type: {0}")]
    InvalidMediaType(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("I/O failure: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(format!("Validation error: {}", err))
    }
}

/// Fixed presentation of one variant
struct Presentation {
    status: u16,
    code: &'static str,
    recoverable: bool,
    action: Option<&'static str>,
    sensitive: bool,
    level: LogLevel,
}

const RETRY_LATER: Option<&str> = Some("Retry after a short delay");

impl Presentation {
    fn caller(status: u16, code: &'static str, action: &'static str) -> Self {
        Self {
            status,
            code,
            recoverable: false,
            action: Some(action),
            sensitive: false,
            level: LogLevel::Debug,
        }
    }

    fn server(code: &'static str, recoverable: bool, action: Option<&'static str>) -> Self {
        Self {
            status: 500,
            code,
            recoverable,
            action,
            sensitive: true,
            level: LogLevel::Error,
        }
    }

    fn at(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }
}

impl AppError {
    fn presentation(&self) -> Presentation {
        match self {
            AppError::Database(_) => Presentation::server("DATABASE_ERROR", true, RETRY_LATER),
            AppError::Storage(_) => Presentation::server("STORAGE_ERROR", true, RETRY_LATER),
            AppError::Processing(_) => Presentation::server(
                "PROCESSING_ERROR",
                false,
                Some("Check that the file is a valid video and try again"),
            ),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                Presentation::server("INTERNAL_ERROR", true, RETRY_LATER)
            }
            AppError::InvalidMediaType(_) => Presentation::caller(
                400,
                "INVALID_MEDIA_TYPE",
                "Upload a file with a supported content type",
            ),
            AppError::BadRequest(_) => {
                Presentation::caller(400, "BAD_REQUEST", "Check request format and parameters")
            }
            AppError::NotFound(_) => {
                Presentation::caller(404, "NOT_FOUND", "Verify the resource ID exists")
            }
            AppError::PayloadTooLarge(_) => {
                Presentation::caller(413, "PAYLOAD_TOO_LARGE", "Reduce file size")
            }
            AppError::Unauthenticated(_) => {
                Presentation::caller(401, "UNAUTHENTICATED", "Check authentication token")
            }
            AppError::Unauthorized(_) => Presentation::caller(
                401,
                "UNAUTHORIZED",
                "Only the owner of this video can modify it",
            )
            .at(LogLevel::Warn),
            AppError::Forbidden(_) => Presentation::caller(
                403,
                "FORBIDDEN",
                "Only the owner of this video can delete it",
            )
            .at(LogLevel::Warn),
        }
    }

    /// Variant name, reported as `error_type` outside production
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Database(_) => "Database",
            AppError::Storage(_) => "Storage",
            AppError::Processing(_) => "Processing",
            AppError::InvalidMediaType(_) => "InvalidMediaType",
            AppError::BadRequest(_) => "BadRequest",
            AppError::NotFound(_) => "NotFound",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Unauthenticated(_) => "Unauthenticated",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Forbidden(_) => "Forbidden",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Display text followed by up to five `Caused by:` lines.
    pub fn detailed_message(&self) -> String {
        const MAX_DEPTH: usize = 5;

        let mut details = self.to_string();
        let mut chain = std::iter::successors(std::error::Error::source(self), |err| err.source());

        for err in chain.by_ref().take(MAX_DEPTH) {
            details.push_str(&format!("\n  Caused by: {}", err));
        }
        if chain.next().is_some() {
            details.push_str("\n  ... (truncated)");
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        self.presentation().status
    }

    fn error_code(&self) -> &'static str {
        self.presentation().code
    }

    fn is_recoverable(&self) -> bool {
        self.presentation().recoverable
    }

    fn suggested_action(&self) -> Option<&'static str> {
        self.presentation().action
    }

    fn is_sensitive(&self) -> bool {
        self.presentation().sensitive
    }

    fn log_level(&self) -> LogLevel {
        self.presentation().level
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::Storage(_) => "Failed to access storage".to_string(),
            AppError::Processing(_) => "Failed to process video".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
            AppError::InvalidMediaType(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::Unauthenticated(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg) => msg.clone(),
        }
    }
}
