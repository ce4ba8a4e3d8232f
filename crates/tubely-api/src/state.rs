use std::sync::Arc;
use std::time::Duration;

use tubely_core::ThumbnailStorageMode;
use tubely_db::VideoRepository;
use tubely_processing::{ContentInspector, StreamOptimizer};
use tubely_storage::{Storage, UrlSigner};

use crate::auth::CredentialVerifier;

/// Per-endpoint upload size limits in bytes
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_video_bytes: usize,
    pub max_thumbnail_bytes: usize,
}

impl UploadLimits {
    /// Limit for the whole request body, applied globally.
    pub fn largest(&self) -> usize {
        self.max_video_bytes.max(self.max_thumbnail_bytes)
    }
}

/// Collaborators of the upload pipeline
#[derive(Clone)]
pub struct MediaState {
    pub repository: Arc<dyn VideoRepository>,
    pub storage: Arc<dyn Storage>,
    pub inspector: Arc<dyn ContentInspector>,
    pub optimizer: Arc<dyn StreamOptimizer>,
    pub limits: UploadLimits,
    pub presign_ttl: Duration,
    pub thumbnail_mode: ThumbnailStorageMode,
}

#[derive(Clone)]
pub struct AppState {
    pub media: MediaState,
    pub auth: Arc<dyn CredentialVerifier>,
    /// Signer for the local backend's asset route; `None` leaves it unmounted
    pub assets: Option<UrlSigner>,
    pub cors_origins: Vec<String>,
    pub is_production: bool,
}
