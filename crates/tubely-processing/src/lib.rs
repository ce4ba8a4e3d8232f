//! Tubely Media Processing Library
//!
//! Media validation for uploaded parts and the two external-tool steps of
//! the video path: probing frame geometry and remuxing for fast start.
//! The tool-backed implementations sit behind [`ContentInspector`] and
//! [`StreamOptimizer`] so they can be replaced in tests.

pub mod error;
pub mod mp4;
pub mod traits;
pub mod validator;

#[cfg(feature = "video")]
pub mod video;

// Re-export commonly used types
pub use error::ProcessingError;
pub use traits::{ContentInspector, StreamOptimizer};
pub use validator::{MediaValidator, ValidatedMedia, ValidationError};

#[cfg(feature = "video")]
pub use video::{FfmpegOptimizer, FfprobeInspector};
