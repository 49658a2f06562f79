// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory container runtime for tests.
//!
//! Containers "run" until the test calls [`FakeContainerRuntime::exit`] or the
//! code under test stops them. Exited containers behave as auto-removed.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use sj_core::{ContainerId, JobId};
use tokio::sync::watch;

use super::{ContainerError, ContainerRuntime, ContainerSpec, ContainerState};

/// Exit code reported for a container stopped through [`ContainerRuntime::stop`].
pub const STOPPED_EXIT_CODE: i64 = 143;

/// Recorded runtime call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerCall {
    Start { job_id: JobId, args: Vec<String> },
    Inspect { id: ContainerId },
    Stop { id: ContainerId },
    Wait { id: ContainerId },
}

struct FakeContainer {
    job_id: JobId,
    exit_tx: watch::Sender<Option<i64>>,
    removed: bool,
}

type StartHook = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct FakeRuntimeState {
    calls: Vec<ContainerCall>,
    containers: HashMap<ContainerId, FakeContainer>,
    next_id: u64,
    fail_next_start: Option<String>,
    after_next_start: Option<StartHook>,
}

/// Fake container runtime for testing
#[derive(Clone, Default)]
pub struct FakeContainerRuntime {
    inner: Arc<Mutex<FakeRuntimeState>>,
}

impl FakeContainerRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ContainerCall> {
        self.inner.lock().calls.clone()
    }

    /// Make the next `start` fail with the given message.
    pub fn fail_next_start(&self, message: impl Into<String>) {
        self.inner.lock().fail_next_start = Some(message.into());
    }

    /// Run `hook` right after the next successful `start`, before it returns.
    ///
    /// Lets tests change the world between a container starting and the
    /// caller recording it.
    pub fn after_next_start(&self, hook: impl FnOnce() + Send + 'static) {
        self.inner.lock().after_next_start = Some(Box::new(hook));
    }

    /// Container started for a job, if any.
    pub fn container_for(&self, job_id: &str) -> Option<ContainerId> {
        let inner = self.inner.lock();
        inner.containers.iter().find(|(_, c)| c.job_id == job_id).map(|(id, _)| id.clone())
    }

    /// Finish a container with the given exit code.
    pub fn exit(&self, id: &ContainerId, code: i64) {
        let mut inner = self.inner.lock();
        if let Some(container) = inner.containers.get_mut(id) {
            container.removed = true;
            container.exit_tx.send_replace(Some(code));
        }
    }

    /// Number of containers that have not exited yet.
    pub fn running_count(&self) -> usize {
        self.inner.lock().containers.values().filter(|c| !c.removed).count()
    }

    fn start_container(&self, spec: &ContainerSpec) -> Result<(ContainerId, Option<StartHook>), ContainerError> {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(ContainerCall::Start { job_id: spec.job_id.clone(), args: spec.args.clone() });
        if let Some(message) = inner.fail_next_start.take() {
            return Err(ContainerError::Command(message));
        }
        inner.next_id += 1;
        let id = ContainerId::new(format!("fake{:012}", inner.next_id));
        let (exit_tx, _) = watch::channel(None);
        inner
            .containers
            .insert(id.clone(), FakeContainer { job_id: spec.job_id.clone(), exit_tx, removed: false });
        Ok((id, inner.after_next_start.take()))
    }
}

#[async_trait]
impl ContainerRuntime for FakeContainerRuntime {
    async fn start(&self, spec: &ContainerSpec) -> Result<ContainerId, ContainerError> {
        let (id, hook) = self.start_container(spec)?;
        if let Some(hook) = hook {
            hook();
        }
        Ok(id)
    }

    async fn inspect_status(&self, id: &ContainerId) -> Result<ContainerState, ContainerError> {
        let mut inner = self.inner.lock();
        inner.calls.push(ContainerCall::Inspect { id: id.clone() });
        Ok(match inner.containers.get(id) {
            Some(c) if !c.removed => ContainerState::Running,
            _ => ContainerState::NotFound,
        })
    }

    async fn stop(&self, id: &ContainerId) -> Result<(), ContainerError> {
        {
            let mut inner = self.inner.lock();
            inner.calls.push(ContainerCall::Stop { id: id.clone() });
            match inner.containers.get(id) {
                Some(c) if !c.removed => {}
                _ => return Err(ContainerError::NotFound(id.to_string())),
            }
        }
        self.exit(id, STOPPED_EXIT_CODE);
        Ok(())
    }

    async fn wait_for_exit(&self, id: &ContainerId) -> Result<i64, ContainerError> {
        let mut rx = {
            let mut inner = self.inner.lock();
            inner.calls.push(ContainerCall::Wait { id: id.clone() });
            match inner.containers.get(id) {
                Some(c) if !c.removed => c.exit_tx.subscribe(),
                _ => return Err(ContainerError::NotFound(id.to_string())),
            }
        };
        loop {
            if let Some(code) = *rx.borrow_and_update() {
                return Ok(code);
            }
            rx.changed().await.map_err(|_| ContainerError::NotFound(id.to_string()))?;
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
