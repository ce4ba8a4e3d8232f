//! Tubely Storage Library
//!
//! Object Store Gateway for uploaded media. The [`Storage`] trait is
//! implemented by an S3 backend (via `object_store`) and a local filesystem
//! backend.
//!
//! # Storage key format
//!
//! - **Videos**: `{orientation}/{token}.{ext}` where `token` is 32 random
//!   bytes, base64url encoded (43 characters)
//! - **Thumbnails**: `thumbnails/{video_id}.{ext}`
//!
//! Keys must not contain `..` or a leading `/`. Key generation lives in the
//! [`keys`] module so every caller produces the same layout.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod signing;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "storage-local")]
pub use factory::create_local_storage;
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use signing::{SignatureError, SignedQuery, UrlSigner};
pub use traits::{ByteStream, ObjectReader, Storage, StorageError, StorageResult};
pub use tubely_core::{ObjectLocation, StorageBackend};
