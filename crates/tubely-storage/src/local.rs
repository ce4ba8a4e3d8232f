use crate::keys::{validate_bucket, validate_key};
use crate::signing::UrlSigner;
use crate::traits::{ByteStream, ObjectReader, Storage, StorageError, StorageResult};
use crate::{ObjectLocation, StorageBackend};
use async_trait::async_trait;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
///
/// Objects live at `{base_path}/{bucket}/{key}`. URLs point at the service's
/// asset route and carry an HMAC-signed expiry, so they behave like S3
/// presigned URLs.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
    bucket: String,
    signer: UrlSigner,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/tubely/assets")
    /// * `base_url` - Base URL of the asset route (e.g., "http://localhost:8091/assets")
    /// * `bucket` - Bucket new uploads go to
    /// * `signer` - Signs and verifies asset URLs
    pub async fn new(
        base_path: impl Into<PathBuf>,
        base_url: String,
        bucket: String,
        signer: UrlSigner,
    ) -> StorageResult<Self> {
        let base_path = base_path.into();
        validate_bucket(&bucket)?;

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
            bucket,
            signer,
        })
    }

    pub fn signer(&self) -> &UrlSigner {
        &self.signer
    }

    /// Convert a location to a filesystem path under the storage root.
    fn object_path(&self, bucket: &str, key: &str) -> StorageResult<PathBuf> {
        validate_bucket(bucket)?;
        validate_key(key)?;
        Ok(self.base_path.join(bucket).join(key))
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn write_atomically(
        &self,
        path: &Path,
        reader: &mut ObjectReader,
    ) -> StorageResult<u64> {
        let partial = path.with_file_name(format!(
            ".{}.partial-{}",
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            crate::keys::random_token()
        ));

        let result = async {
            let mut file = fs::File::create(&partial).await.map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to create file {}: {}",
                    partial.display(),
                    e
                ))
            })?;

            let bytes_copied = tokio::io::copy(reader, &mut file).await.map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to write stream to file {}: {}",
                    path.display(),
                    e
                ))
            })?;

            file.flush().await?;
            file.sync_all().await.map_err(|e| {
                StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
            })?;

            fs::rename(&partial, path).await.map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to move file into place {}: {}",
                    path.display(),
                    e
                ))
            })?;

            Ok::<u64, StorageError>(bytes_copied)
        }
        .await;

        if result.is_err() {
            if let Err(e) = fs::remove_file(&partial).await {
                tracing::debug!(path = %partial.display(), error = %e, "No partial file to clean up");
            }
        }
        result
    }
}

#[async_trait]
impl Storage for LocalStorage {
    fn default_bucket(&self) -> &str {
        &self.bucket
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        _content_length: Option<u64>,
        mut reader: ObjectReader,
    ) -> StorageResult<ObjectLocation> {
        let path = self.object_path(bucket, key)?;
        let start = std::time::Instant::now();

        self.ensure_parent_dir(&path).await?;
        let bytes_copied = self.write_atomically(&path, &mut reader).await?;

        tracing::info!(
            path = %path.display(),
            bucket = %bucket,
            key = %key,
            content_type = %content_type,
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage stream upload successful"
        );

        Ok(ObjectLocation::new(bucket, key))
    }

    async fn presign_get(
        &self,
        location: &ObjectLocation,
        expires_in: Duration,
    ) -> StorageResult<String> {
        self.object_path(&location.bucket, &location.key)?;
        let query = self.signer.sign(location, expires_in)?;
        Ok(format!(
            "{}/{}/{}?{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&location.bucket),
            location.key,
            query.to_query_string()
        ))
    }

    async fn download_stream(&self, location: &ObjectLocation) -> StorageResult<ByteStream> {
        let path = self.object_path(&location.bucket, &location.key)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(location.to_string()));
        }

        let file = fs::File::open(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to open file {}: {}", path.display(), e))
        })?;

        let reader = tokio_util::io::ReaderStream::new(file);

        let key = location.to_string();
        let path_display = path.display().to_string();
        let stream = reader.map(move |result| {
            result.map_err(|e| {
                tracing::error!(
                    path = %path_display,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Local storage stream download error"
                );
                StorageError::DownloadFailed(format!("Failed to read chunk: {}", e))
            })
        });

        Ok(Box::pin(stream))
    }

    async fn exists(&self, location: &ObjectLocation) -> StorageResult<bool> {
        let path = self.object_path(&location.bucket, &location.key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
