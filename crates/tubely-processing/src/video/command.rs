use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::ProcessingError;

/// Run an external tool to completion and return its stdout.
///
/// The child is killed if the deadline passes or the calling future is
/// dropped. A non-zero exit logs stderr and fails.
pub(crate) async fn run_tool(
    tool: &'static str,
    mut command: Command,
    timeout: Duration,
) -> Result<Vec<u8>, ProcessingError> {
    let start = std::time::Instant::now();

    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = match tokio::time::timeout(timeout, command.output()).await {
        Ok(result) => result.map_err(|source| ProcessingError::Spawn { tool, source })?,
        Err(_) => {
            tracing::error!(
                process.executable.name = tool,
                timeout_secs = timeout.as_secs(),
                "External tool timed out, killed"
            );
            return Err(ProcessingError::Timeout { tool, timeout });
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        tracing::error!(
            process.executable.name = tool,
            status = %output.status,
            stderr = %stderr,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "External tool failed"
        );
        return Err(ProcessingError::ToolFailed {
            tool,
            status: output.status.to_string(),
            stderr,
        });
    }

    tracing::debug!(
        process.executable.name = tool,
        stdout_bytes = output.stdout.len(),
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "External tool finished"
    );

    Ok(output.stdout)
}
