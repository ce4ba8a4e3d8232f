//! Shared key generation for storage backends.
//!
//! Video keys are `{orientation}/{token}.{ext}`; thumbnail keys are
//! `thumbnails/{video_id}.{ext}`.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{CryptoRng, RngCore};
use tubely_core::Orientation;
use uuid::Uuid;

use crate::{StorageError, StorageResult};

/// Random bytes behind every generated video key
pub const TOKEN_BYTES: usize = 32;

/// 32 bytes from the thread-local CSPRNG, base64url without padding (43 chars).
pub fn random_token() -> String {
    random_token_with(&mut rand::rng())
}

pub fn random_token_with<R: RngCore + CryptoRng>(rng: &mut R) -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Generate a fresh storage key for an uploaded video.
///
/// The orientation prefix groups objects by aspect ratio. `extension` is the
/// validated media subtype (e.g. `mp4`).
pub fn generate_video_key(orientation: Orientation, extension: &str) -> String {
    format!("{}/{}.{}", orientation.as_str(), random_token(), extension)
}

/// Key for a thumbnail kept in blob storage.
pub fn thumbnail_key(video_id: Uuid, extension: &str) -> String {
    format!("thumbnails/{}.{}", video_id, extension)
}

/// Reject keys that could escape a bucket prefix or an on-disk root.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.contains('\0')
        || key.split('/').any(|segment| segment.is_empty() || segment == "..")
    {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Bucket names are a single path segment.
pub fn validate_bucket(bucket: &str) -> StorageResult<()> {
    if bucket.is_empty()
        || bucket == "."
        || bucket == ".."
        || bucket.contains(['/', '\\', '\0'])
    {
        return Err(StorageError::InvalidKey(format!("invalid bucket: {}", bucket)));
    }
    Ok(())
}
