//! Tubely Core Library
//!
//! This crate provides the domain models, error types, configuration and the
//! ownership guard shared by every Tubely component.

pub mod config;
pub mod error;
pub mod models;
pub mod ownership;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, ThumbnailStorageMode, TubelyConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    CreateVideoParams, Dimensions, ObjectLocation, Orientation, ThumbnailRef, VideoRecord,
};
pub use ownership::{authorize, Action};
pub use storage_types::StorageBackend;
