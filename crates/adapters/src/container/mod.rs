// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Container runtime adapter.
//!
//! Jobs run as detached, auto-removed containers. The runtime only needs to
//! start one, report its state, stop it, and block until it exits.

mod docker;

use async_trait::async_trait;
use sj_core::{ContainerId, JobId, MountPlan};
use thiserror::Error;

pub use docker::DockerRuntime;

/// Label attached to every job container so it can be found by job id.
pub const JOB_ID_LABEL: &str = "sj.job_id";

/// Errors from container runtime operations
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("failed to run container runtime: {0}")]
    Spawn(String),
    #[error("container not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Command(String),
    #[error("container runtime timed out: {0}")]
    Timeout(String),
}

/// What to run for one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    pub job_id: JobId,
    pub image: String,
    pub args: Vec<String>,
    pub mounts: MountPlan,
}

/// Observed state of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Created,
    Running,
    Exited,
    Dead,
    /// The container is gone (auto-removed after exit, or never existed).
    NotFound,
}

sj_core::wire_names! {
    ContainerState {
        Created => "created",
        Running => "running",
        Exited => "exited",
        Dead => "dead",
        NotFound => "not_found",
    }
}

impl ContainerState {
    /// Map a runtime-reported status string onto a state.
    ///
    /// Paused and restarting containers are still alive; a container being
    /// removed has already exited.
    pub fn from_status(status: &str) -> Self {
        match status.trim() {
            "created" => Self::Created,
            "running" | "paused" | "restarting" => Self::Running,
            "exited" | "removing" => Self::Exited,
            "dead" => Self::Dead,
            _ => Self::NotFound,
        }
    }

    pub fn is_alive(&self) -> bool {
        matches!(self, Self::Created | Self::Running)
    }
}

/// Adapter for the container runtime
#[async_trait]
pub trait ContainerRuntime: Clone + Send + Sync + 'static {
    /// Start a detached container and return its id.
    async fn start(&self, spec: &ContainerSpec) -> Result<ContainerId, ContainerError>;

    /// Current state; a missing container is `NotFound`, not an error.
    async fn inspect_status(&self, id: &ContainerId) -> Result<ContainerState, ContainerError>;

    /// Ask the container to stop.
    async fn stop(&self, id: &ContainerId) -> Result<(), ContainerError>;

    /// Block until the container exits and return its exit code.
    ///
    /// Has no timeout. Returns `ContainerError::NotFound` when the container
    /// is already gone.
    async fn wait_for_exit(&self, id: &ContainerId) -> Result<i64, ContainerError>;
}

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ContainerCall, FakeContainerRuntime, STOPPED_EXIT_CODE};

#[cfg(test)]
#[path = "container_tests.rs"]
mod tests;
