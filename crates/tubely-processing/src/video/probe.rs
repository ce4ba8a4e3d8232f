//! Content inspector backed by ffprobe

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tubely_core::Dimensions;

use super::command::run_tool;
use super::{ensure_file, validate_tool_path};
use crate::{ContentInspector, ProcessingError};

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    #[serde(default)]
    codec_type: Option<String>,
}

/// Parse `ffprobe -print_format json -show_streams` output.
///
/// Only the first stream is considered. It must report both dimensions.
pub fn parse_probe_output(stdout: &[u8]) -> Result<Dimensions, ProcessingError> {
    let probe: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| ProcessingError::MalformedOutput(e.to_string()))?;

    let first = probe
        .streams
        .first()
        .ok_or_else(|| ProcessingError::NoStreams("probe output".to_string()))?;

    match (first.width, first.height) {
        (Some(width), Some(height)) => Ok(Dimensions::new(width, height)),
        _ => Err(ProcessingError::MalformedOutput(format!(
            "first stream ({}) has no width/height",
            first.codec_type.as_deref().unwrap_or("unknown")
        ))),
    }
}

pub struct FfprobeInspector {
    ffprobe_path: String,
    timeout: Duration,
}

impl FfprobeInspector {
    pub fn new(ffprobe_path: impl Into<String>, timeout: Duration) -> Result<Self, ProcessingError> {
        let ffprobe_path = ffprobe_path.into();
        validate_tool_path(&ffprobe_path)?;
        Ok(Self {
            ffprobe_path,
            timeout,
        })
    }
}

#[async_trait]
impl ContentInspector for FfprobeInspector {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn inspect(&self, path: &Path) -> Result<Dimensions, ProcessingError> {
        ensure_file(path).await?;

        let mut command = Command::new(&self.ffprobe_path);
        command
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path);

        let stdout = run_tool("ffprobe", command, self.timeout).await?;
        let dimensions = parse_probe_output(&stdout).map_err(|e| match e {
            ProcessingError::NoStreams(_) => ProcessingError::NoStreams(path.display().to_string()),
            other => other,
        })?;

        tracing::info!(
            width = dimensions.width,
            height = dimensions.height,
            "Video probe completed"
        );

        Ok(dimensions)
    }
}
