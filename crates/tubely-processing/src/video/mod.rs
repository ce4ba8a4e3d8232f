//! ffprobe / ffmpeg backed implementations

mod command;
pub mod faststart;
pub mod probe;

pub use faststart::FfmpegOptimizer;
pub use probe::{parse_probe_output, FfprobeInspector};

use crate::ProcessingError;
use tubely_core::config::is_unsafe_tool_path;

fn validate_tool_path(path: &str) -> Result<(), ProcessingError> {
    if is_unsafe_tool_path(path) {
        return Err(ProcessingError::InvalidPath(format!(
            "tool path contains dangerous characters: {}",
            path
        )));
    }
    Ok(())
}

/// Input files must exist before a tool is spawned on them
async fn ensure_file(path: &std::path::Path) -> Result<(), ProcessingError> {
    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|e| ProcessingError::InvalidPath(format!("{}: {}", path.display(), e)))?;
    if !meta.is_file() {
        return Err(ProcessingError::InvalidPath(format!(
            "{} is not a file",
            path.display()
        )));
    }
    Ok(())
}
