//! Metadata store connection and schema migrations

use anyhow::{Context, Result};
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::path::Path;
use std::time::Duration;
use tubely_core::Config;

const IDLE_TIMEOUT: Duration = Duration::from_secs(10 * 60);
const MAX_LIFETIME: Duration = Duration::from_secs(30 * 60);

fn pool_options(config: &Config) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections())
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .idle_timeout(IDLE_TIMEOUT)
        .max_lifetime(MAX_LIFETIME)
}

/// Open the pool and bring the `videos` schema up to date.
pub async fn setup_database(config: &Config) -> Result<PgPool> {
    tracing::info!(
        max_connections = config.db_max_connections(),
        acquire_timeout_secs = config.db_timeout_seconds(),
        "Opening metadata store pool"
    );

    let pool = pool_options(config)
        .connect(config.database_url())
        .await
        .context("Failed to connect to DATABASE_URL")?;

    let migrations = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
    let migrator = Migrator::new(migrations.as_path())
        .await
        .with_context(|| format!("Failed to read migrations from {}", migrations.display()))?;
    migrator
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;

    tracing::info!(
        migrations = migrator.iter().count(),
        "Metadata store ready"
    );

    Ok(pool)
}
