//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::{ObjectLocation, StorageBackend};
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncRead;
use tubely_core::AppError;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Object contents as a stream of chunks
pub type ByteStream = Pin<Box<dyn Stream<Item = StorageResult<Bytes>> + Send>>;

/// Source that a `put` drains into the backend
pub type ObjectReader = Pin<Box<dyn AsyncRead + Send>>;

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) must implement this trait.
/// Objects are addressed by `(bucket, key)`; what callers persist is the
/// returned [`ObjectLocation`], and readable URLs are minted from it on demand
/// with [`Storage::presign_get`].
#[async_trait]
pub trait Storage: Send + Sync {
    /// Bucket new uploads are written to
    fn default_bucket(&self) -> &str;

    /// Stream `reader` into `bucket/key` with the given content type.
    ///
    /// `content_length` is a hint; backends read until EOF either way. On
    /// error nothing is guaranteed to exist at the location.
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        content_length: Option<u64>,
        reader: ObjectReader,
    ) -> StorageResult<ObjectLocation>;

    /// Mint a GET URL for the object valid for `expires_in`.
    ///
    /// Every returned URL is independently valid until it expires. Only the
    /// local backend guarantees distinct URLs per call: S3 SigV4 signatures
    /// cover `X-Amz-Date`, which has one-second granularity, so two calls
    /// within the same second may return byte-identical URLs.
    /// Does not check that the object exists.
    async fn presign_get(
        &self,
        location: &ObjectLocation,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Stream the object's bytes
    async fn download_stream(&self, location: &ObjectLocation) -> StorageResult<ByteStream>;

    /// Check if an object exists
    async fn exists(&self, location: &ObjectLocation) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::ConfigError(msg) => {
                AppError::Internal(format!("Storage configuration error: {}", msg))
            }
            other => AppError::Storage(other.to_string()),
        }
    }
}
