//! Storage setup and initialization

use anyhow::Result;
use std::sync::Arc;
use tubely_core::{Config, StorageBackend};
use tubely_storage::{Storage, UrlSigner};

/// Build the configured backend.
///
/// The local backend also hands back its URL signer so the asset route can
/// verify the URLs it mints.
pub async fn setup_storage(config: &Config) -> Result<(Arc<dyn Storage>, Option<UrlSigner>)> {
    tracing::info!(backend = %config.storage_backend(), "Initializing storage...");

    let (storage, signer): (Arc<dyn Storage>, Option<UrlSigner>) = match config.storage_backend()
    {
        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let local = tubely_storage::create_local_storage(config).await?;
            let signer = local.signer().clone();
            (Arc::new(local), Some(signer))
        }
        _ => (tubely_storage::create_storage(config).await?, None),
    };

    tracing::info!(
        backend = %storage.backend_type(),
        bucket = %storage.default_bucket(),
        "Storage initialized successfully"
    );

    Ok((storage, signer))
}
