//! Seams between the upload orchestrator and the external media tools.

use async_trait::async_trait;
use std::path::Path;
use tempfile::TempPath;
use tubely_core::{Dimensions, Orientation};

use crate::ProcessingError;

/// Reads frame geometry from a video file on local disk.
#[async_trait]
pub trait ContentInspector: Send + Sync {
    /// Width and height of the first stream
    async fn inspect(&self, path: &Path) -> Result<Dimensions, ProcessingError>;

    async fn orientation(&self, path: &Path) -> Result<Orientation, ProcessingError> {
        let dimensions = self.inspect(path).await?;
        Ok(Orientation::from(dimensions))
    }
}

/// Rewrites a video so its index precedes the media payload.
#[async_trait]
pub trait StreamOptimizer: Send + Sync {
    /// Produce a new file next to `input`; the input is left untouched.
    ///
    /// The returned path is deleted when dropped.
    async fn optimize(&self, input: &Path) -> Result<TempPath, ProcessingError>;
}
