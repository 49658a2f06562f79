// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution with timeouts.

use std::process::Output;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;

/// Default timeout for short docker CLI calls (run -d, inspect, stop).
pub const DOCKER_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for a recursive `chown` over a job directory.
pub const CHOWN_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum SubprocessError {
    #[error("failed to exec {label}: {source}")]
    Spawn {
        label: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{label} timed out after {}s", timeout.as_secs())]
    Timeout { label: String, timeout: Duration },
}

/// Run a command to completion, killing it if it outlives `timeout`.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    label: &str,
) -> Result<Output, SubprocessError> {
    cmd.kill_on_drop(true);
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(source)) => Err(SubprocessError::Spawn { label: label.to_string(), source }),
        Err(_) => {
            tracing::warn!(label, timeout_ms = timeout.as_millis() as u64, "subprocess timed out");
            Err(SubprocessError::Timeout { label: label.to_string(), timeout })
        }
    }
}

/// Trimmed stderr of a finished command, for error messages.
pub fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
