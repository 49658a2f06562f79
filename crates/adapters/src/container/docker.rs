// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Docker CLI runtime.

use std::time::Duration;

use async_trait::async_trait;
use sj_core::ContainerId;
use tokio::process::Command;

use super::{ContainerError, ContainerRuntime, ContainerSpec, ContainerState, JOB_ID_LABEL};
use crate::subprocess::{run_with_timeout, stderr_text, SubprocessError, DOCKER_TIMEOUT};

/// Runs job containers through the `docker` CLI.
#[derive(Clone)]
pub struct DockerRuntime {
    binary: String,
    timeout: Duration,
}

impl Default for DockerRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl DockerRuntime {
    pub fn new() -> Self {
        Self { binary: "docker".to_string(), timeout: DOCKER_TIMEOUT }
    }

    /// Use a different CLI binary (for example `podman`).
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Timeout for short CLI calls. `wait` is never bounded.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn command(&self, args: &[String]) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args);
        cmd
    }

    async fn run_docker(&self, args: &[String]) -> Result<String, ContainerError> {
        let verb = args.first().map(String::as_str).unwrap_or("");
        let output = run_with_timeout(self.command(args), self.timeout, verb)
            .await
            .map_err(map_subprocess)?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(classify_failure(verb, &stderr_text(&output)))
        }
    }

    /// Pull `image` if it is not present locally.
    ///
    /// The pull has no timeout, so the bounded `run` only covers create and
    /// start.
    async fn ensure_image(&self, image: &str) -> Result<(), ContainerError> {
        let inspect = vec!["image".to_string(), "inspect".to_string(), image.to_string()];
        if self.run_docker(&inspect).await.is_ok() {
            return Ok(());
        }

        tracing::info!(image, "pulling image");
        let output = self
            .command(&["pull".to_string(), image.to_string()])
            .output()
            .await
            .map_err(|e| ContainerError::Spawn(format!("failed to exec {}: {}", self.binary, e)))?;
        if output.status.success() {
            Ok(())
        } else {
            Err(classify_failure("pull", &stderr_text(&output)))
        }
    }

    /// Force-remove any container carrying this job's label.
    async fn remove_labelled(&self, job_id: &str) {
        let ids = match self.run_docker(&labelled_lookup_args(job_id)).await {
            Ok(stdout) => stdout.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from).collect::<Vec<_>>(),
            Err(e) => {
                tracing::error!(job_id, error = %e, "could not look up container after start timeout");
                return;
            }
        };
        if ids.is_empty() {
            return;
        }

        let mut args = vec!["rm".to_string(), "-f".to_string()];
        args.extend(ids.iter().cloned());
        match self.run_docker(&args).await {
            Ok(_) => tracing::warn!(job_id, containers = ?ids, "removed container left by start timeout"),
            Err(e) => tracing::error!(job_id, containers = ?ids, error = %e, "failed to remove container left by start timeout"),
        }
    }
}

/// Arguments listing every container, running or not, labelled with `job_id`.
pub fn labelled_lookup_args(job_id: &str) -> Vec<String> {
    vec![
        "ps".to_string(),
        "-aq".to_string(),
        "--filter".to_string(),
        format!("label={}={}", JOB_ID_LABEL, job_id),
    ]
}

/// Build the `docker run` argument list for a job.
pub fn run_args(spec: &ContainerSpec) -> Vec<String> {
    let mut args = vec![
        "run".to_string(),
        "-d".to_string(),
        "--rm".to_string(),
        "--label".to_string(),
        format!("{}={}", JOB_ID_LABEL, spec.job_id),
    ];
    for volume in spec.mounts.volume_args() {
        args.push("-v".to_string());
        args.push(volume);
    }
    args.push(spec.image.clone());
    args.extend(spec.args.iter().cloned());
    args
}

fn map_subprocess(e: SubprocessError) -> ContainerError {
    match e {
        SubprocessError::Spawn { .. } => ContainerError::Spawn(e.to_string()),
        SubprocessError::Timeout { .. } => ContainerError::Timeout(e.to_string()),
    }
}

fn classify_failure(verb: &str, stderr: &str) -> ContainerError {
    if stderr.contains("No such container") || stderr.contains("no such container") {
        ContainerError::NotFound(stderr.to_string())
    } else {
        ContainerError::Command(format!("docker {} failed: {}", verb, stderr))
    }
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn start(&self, spec: &ContainerSpec) -> Result<ContainerId, ContainerError> {
        let args = run_args(spec);
        tracing::info!(
            job_id = %spec.job_id,
            image = %spec.image,
            mounts = spec.mounts.len(),
            "starting container"
        );
        self.ensure_image(&spec.image).await?;
        let stdout = match self.run_docker(&args).await {
            Ok(stdout) => stdout,
            Err(ContainerError::Timeout(message)) => {
                // The daemon may still create and start the container after
                // the CLI is killed; nothing would ever track it.
                self.remove_labelled(spec.job_id.as_str()).await;
                return Err(ContainerError::Timeout(message));
            }
            Err(e) => return Err(e),
        };
        // `run -d` may print pull progress before the id; the id is the last line.
        let id = stdout.lines().last().map(str::trim).unwrap_or("");
        if id.is_empty() {
            return Err(ContainerError::Command("docker run printed no container id".to_string()));
        }
        let id = ContainerId::new(id);
        tracing::info!(job_id = %spec.job_id, container = id.short(), "container started");
        Ok(id)
    }

    async fn inspect_status(&self, id: &ContainerId) -> Result<ContainerState, ContainerError> {
        let args = vec![
            "inspect".to_string(),
            "--format".to_string(),
            "{{.State.Status}}".to_string(),
            id.to_string(),
        ];
        match self.run_docker(&args).await {
            Ok(status) => Ok(ContainerState::from_status(&status)),
            Err(ContainerError::NotFound(_)) => Ok(ContainerState::NotFound),
            Err(e) => Err(e),
        }
    }

    async fn stop(&self, id: &ContainerId) -> Result<(), ContainerError> {
        tracing::info!(container = id.short(), "stopping container");
        self.run_docker(&["stop".to_string(), id.to_string()]).await.map(|_| ())
    }

    async fn wait_for_exit(&self, id: &ContainerId) -> Result<i64, ContainerError> {
        let output = self
            .command(&["wait".to_string(), id.to_string()])
            .output()
            .await
            .map_err(|e| ContainerError::Spawn(format!("failed to exec docker: {}", e)))?;

        if !output.status.success() {
            return Err(classify_failure("wait", &stderr_text(&output)));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout.trim().parse::<i64>().map_err(|_| {
            ContainerError::Command(format!("docker wait printed no exit code: {:?}", stdout.trim()))
        })
    }
}

#[cfg(test)]
#[path = "docker_tests.rs"]
mod tests;
