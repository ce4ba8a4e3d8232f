//! Wiring of repositories, storage and media tools into [`AppState`]

use anyhow::{Context, Result};
use sqlx::PgPool;
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::PostgresVideoRepository;
use tubely_processing::{FfmpegOptimizer, FfprobeInspector};
use tubely_storage::{Storage, UrlSigner};

use crate::auth::JwtVerifier;
use crate::state::{AppState, MediaState, UploadLimits};

pub fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
    asset_signer: Option<UrlSigner>,
) -> Result<Arc<AppState>> {
    let inspector = FfprobeInspector::new(config.ffprobe_path(), config.processing_timeout())
        .context("Invalid FFPROBE_PATH")?;
    let optimizer = FfmpegOptimizer::new(config.ffmpeg_path(), config.processing_timeout())
        .context("Invalid FFMPEG_PATH")?;

    let media = MediaState {
        repository: Arc::new(PostgresVideoRepository::new(pool)),
        storage,
        inspector: Arc::new(inspector),
        optimizer: Arc::new(optimizer),
        limits: UploadLimits {
            max_video_bytes: config.max_video_size_bytes(),
            max_thumbnail_bytes: config.max_thumbnail_size_bytes(),
        },
        presign_ttl: config.presigned_url_ttl(),
        thumbnail_mode: config.thumbnail_storage(),
    };

    tracing::info!(
        max_video_mb = media.limits.max_video_bytes / 1024 / 1024,
        max_thumbnail_mb = media.limits.max_thumbnail_bytes / 1024 / 1024,
        presigned_url_ttl_secs = media.presign_ttl.as_secs(),
        thumbnail_storage = ?media.thumbnail_mode,
        ffmpeg_path = %config.ffmpeg_path(),
        ffprobe_path = %config.ffprobe_path(),
        "Media pipeline initialized"
    );

    Ok(Arc::new(AppState {
        media,
        auth: Arc::new(JwtVerifier::new(config.jwt_secret(), config.jwt_issuer())),
        assets: asset_signer,
        cors_origins: config.cors_origins().to_vec(),
        is_production: config.is_production(),
    }))
}
