//! Stream optimizer backed by ffmpeg

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tempfile::TempPath;
use tokio::process::Command;

use super::command::run_tool;
use super::{ensure_file, validate_tool_path};
use crate::{mp4, ProcessingError, StreamOptimizer};

/// Remuxes with `-c copy -movflags faststart`; streams are never re-encoded.
pub struct FfmpegOptimizer {
    ffmpeg_path: String,
    timeout: Duration,
}

impl FfmpegOptimizer {
    pub fn new(ffmpeg_path: impl Into<String>, timeout: Duration) -> Result<Self, ProcessingError> {
        let ffmpeg_path = ffmpeg_path.into();
        validate_tool_path(&ffmpeg_path)?;
        Ok(Self {
            ffmpeg_path,
            timeout,
        })
    }
}

#[async_trait]
impl StreamOptimizer for FfmpegOptimizer {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    async fn optimize(&self, input: &Path) -> Result<TempPath, ProcessingError> {
        ensure_file(input).await?;
        let start = std::time::Instant::now();

        let dir = input.parent().unwrap_or_else(|| Path::new("."));
        let output = tempfile::Builder::new()
            .prefix("tubely-faststart-")
            .suffix(".mp4")
            .tempfile_in(dir)?
            .into_temp_path();

        let mut command = Command::new(&self.ffmpeg_path);
        command
            .arg("-y")
            .arg("-i")
            .arg(input)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
            .arg(&*output);

        // On any error `output` is dropped here and the file removed.
        run_tool("ffmpeg", command, self.timeout).await?;

        let size_bytes = tokio::fs::metadata(&output).await?.len();
        if size_bytes == 0 {
            return Err(ProcessingError::EmptyOutput);
        }

        match mp4::file_is_fast_start(&output).await {
            Ok(fast_start) => tracing::info!(
                size_bytes,
                fast_start = ?fast_start,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Fast-start remux completed"
            ),
            Err(e) => tracing::warn!(error = %e, "Could not inspect remuxed container"),
        }

        Ok(output)
    }
}
