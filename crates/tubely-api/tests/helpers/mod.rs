#![allow(dead_code)]

pub mod auth;
pub mod fixtures;
pub mod mocks;

use axum_test::TestServer;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tubely_api::auth::JwtVerifier;
use tubely_api::setup::routes::setup_routes;
use tubely_api::{AppState, MediaState, UploadLimits};
use tubely_core::{CreateVideoParams, ObjectLocation, ThumbnailStorageMode, VideoRecord};
use tubely_db::VideoRepository;
use tubely_storage::{LocalStorage, UrlSigner};
use uuid::Uuid;

pub use auth::issue_token;
use auth::{TEST_JWT_ISSUER, TEST_JWT_SECRET};
use mocks::{FakeOptimizer, FixedInspector, InMemoryVideoRepository};

pub const TEST_BUCKET: &str = "tubely";
pub const ASSET_BASE_URL: &str = "http://localhost:8091/assets";
const ASSET_SECRET: &str = "asset-signing-secret-for-tests";

pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub repository: Arc<InMemoryVideoRepository>,
    pub inspector: Arc<FixedInspector>,
    pub optimizer: Arc<FakeOptimizer>,
    pub storage_dir: TempDir,
}

pub struct TestAppBuilder {
    inspector: FixedInspector,
    optimizer: FakeOptimizer,
    thumbnail_mode: ThumbnailStorageMode,
    limits: UploadLimits,
}

impl TestApp {
    pub fn builder() -> TestAppBuilder {
        TestAppBuilder {
            inspector: FixedInspector::new(1920, 1080),
            optimizer: FakeOptimizer::working(),
            thumbnail_mode: ThumbnailStorageMode::Object,
            limits: UploadLimits {
                max_video_bytes: 1024 * 1024,
                max_thumbnail_bytes: 1024 * 1024,
            },
        }
    }

    pub async fn new() -> Self {
        Self::builder().build().await
    }

    /// A record owned by `owner`, inserted directly into the store.
    pub async fn seed_video(&self, owner: Uuid) -> VideoRecord {
        self.repository
            .create(CreateVideoParams {
                user_id: owner,
                title: "Boots".to_string(),
                description: Some("Test video".to_string()),
            })
            .await
            .unwrap()
    }

    /// Where the local backend keeps `location` on disk.
    pub fn object_path(&self, location: &ObjectLocation) -> PathBuf {
        self.storage_dir
            .path()
            .join(&location.bucket)
            .join(&location.key)
    }

    pub fn signer(&self) -> &UrlSigner {
        self.state.assets.as_ref().unwrap()
    }
}

/// Path and query of a signed asset URL, as the test server expects them.
pub fn asset_path(url: &str) -> String {
    url.strip_prefix("http://localhost:8091")
        .unwrap_or(url)
        .to_string()
}

impl TestAppBuilder {
    pub fn inspector(mut self, width: u32, height: u32) -> Self {
        self.inspector = FixedInspector::new(width, height);
        self
    }

    pub fn failing_optimizer(mut self) -> Self {
        self.optimizer = FakeOptimizer::failing();
        self
    }

    pub fn thumbnail_mode(mut self, mode: ThumbnailStorageMode) -> Self {
        self.thumbnail_mode = mode;
        self
    }

    pub fn max_thumbnail_bytes(mut self, bytes: usize) -> Self {
        self.limits.max_thumbnail_bytes = bytes;
        self
    }

    pub async fn build(self) -> TestApp {
        let storage_dir = tempfile::tempdir().unwrap();
        let signer = UrlSigner::new(ASSET_SECRET).unwrap();
        let storage = LocalStorage::new(
            storage_dir.path(),
            ASSET_BASE_URL.to_string(),
            TEST_BUCKET.to_string(),
            signer.clone(),
        )
        .await
        .unwrap();

        let repository = Arc::new(InMemoryVideoRepository::default());
        let inspector = Arc::new(self.inspector);
        let optimizer = Arc::new(self.optimizer);

        let state = Arc::new(AppState {
            media: MediaState {
                repository: repository.clone(),
                storage: Arc::new(storage),
                inspector: inspector.clone(),
                optimizer: optimizer.clone(),
                limits: self.limits,
                presign_ttl: Duration::from_secs(300),
                thumbnail_mode: self.thumbnail_mode,
            },
            auth: Arc::new(JwtVerifier::new(TEST_JWT_SECRET, TEST_JWT_ISSUER)),
            assets: Some(signer),
            cors_origins: vec!["*".to_string()],
            is_production: false,
        });

        let router = setup_routes(state.clone()).unwrap();
        let server = TestServer::new(router).unwrap();

        TestApp {
            server,
            state,
            repository,
            inspector,
            optimizer,
            storage_dir,
        }
    }
}
