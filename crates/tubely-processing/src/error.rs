use std::time::Duration;
use thiserror::Error;
use tubely_core::AppError;

/// Failures of the external-tool steps
///
/// Tool stderr is carried for logging only and is not part of `Display`.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Failed to start {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}")]
    ToolFailed {
        tool: &'static str,
        status: String,
        stderr: String,
    },

    #[error("{tool} did not finish within {timeout:?}")]
    Timeout {
        tool: &'static str,
        timeout: Duration,
    },

    #[error("Malformed probe output: {0}")]
    MalformedOutput(String),

    #[error("No streams found in {0}")]
    NoStreams(String),

    #[error("Optimized output is empty")]
    EmptyOutput,

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ProcessingError> for AppError {
    fn from(err: ProcessingError) -> Self {
        AppError::Processing(err.to_string())
    }
}
