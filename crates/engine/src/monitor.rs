// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exit monitor pool.
//!
//! Each started container with requested ownership gets one monitor task:
//!
//! ```text
//! wait for exit (unbounded) ─► settle delay ─► authoritative pass ─► drop pending record
//! ```
//!
//! Tasks enter through a bounded queue and run with at most
//! `max_concurrent` in flight. A full queue rejects the submission; the
//! caller's durable pending record is then left for [`crate::Launcher::recover`].

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use sj_adapters::{ContainerError, ContainerRuntime, PermissionAdapter};
use sj_core::{ContainerId, JobId, Ownership};
use sj_storage::{JobStore, PendingReconcile};
use thiserror::Error;
use tokio::sync::{mpsc, Semaphore};
use tokio_util::task::TaskTracker;

use crate::reconciler::Reconciler;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MonitorError {
    #[error("monitor queue is full ({0} waiting)")]
    QueueFull(usize),
    #[error("monitor pool is shut down")]
    Closed,
}

/// Pool sizing and timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorSettings {
    pub max_concurrent: usize,
    pub queue_capacity: usize,
    pub settle_delay: Duration,
}

/// One container to watch and the tree to reconcile after it exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorTask {
    pub job_id: JobId,
    pub container_id: ContainerId,
    pub job_dir: PathBuf,
    pub ownership: Ownership,
}

impl From<PendingReconcile> for MonitorTask {
    fn from(p: PendingReconcile) -> Self {
        Self { job_id: p.job_id, container_id: p.container_id, job_dir: p.job_dir, ownership: p.ownership }
    }
}

struct MonitorContext<R: ContainerRuntime, P: PermissionAdapter> {
    runtime: R,
    reconciler: Reconciler<P>,
    store: JobStore,
    settle_delay: Duration,
}

/// Bounded pool of exit monitors.
pub struct MonitorPool {
    tx: mpsc::Sender<MonitorTask>,
    tracker: TaskTracker,
    queue_capacity: usize,
}

impl MonitorPool {
    /// Start the pool's dispatcher. Must be called inside a tokio runtime.
    pub fn spawn<R, P>(runtime: R, reconciler: Reconciler<P>, store: JobStore, settings: MonitorSettings) -> Self
    where
        R: ContainerRuntime,
        P: PermissionAdapter,
    {
        let queue_capacity = settings.queue_capacity.max(1);
        let (tx, rx) = mpsc::channel(queue_capacity);
        let tracker = TaskTracker::new();
        let ctx = Arc::new(MonitorContext { runtime, reconciler, store, settle_delay: settings.settle_delay });
        let semaphore = Arc::new(Semaphore::new(settings.max_concurrent.max(1)));

        tracker.spawn(dispatch(rx, semaphore, tracker.clone(), ctx));
        Self { tx, tracker, queue_capacity }
    }

    /// Queue a monitor without waiting.
    pub fn submit(&self, task: MonitorTask) -> Result<(), MonitorError> {
        self.tx.try_send(task).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => MonitorError::QueueFull(self.queue_capacity),
            mpsc::error::TrySendError::Closed(_) => MonitorError::Closed,
        })
    }

    /// Monitors queued or running.
    pub fn in_flight(&self) -> usize {
        // The dispatcher itself is one tracked task.
        self.tracker.len().saturating_sub(1) + (self.tx.max_capacity() - self.tx.capacity())
    }

    /// Stop accepting work and wait for every queued and running monitor.
    pub async fn shutdown(self) {
        let Self { tx, tracker, .. } = self;
        drop(tx);
        tracker.close();
        tracker.wait().await;
    }
}

async fn dispatch<R, P>(
    mut rx: mpsc::Receiver<MonitorTask>,
    semaphore: Arc<Semaphore>,
    tracker: TaskTracker,
    ctx: Arc<MonitorContext<R, P>>,
) where
    R: ContainerRuntime,
    P: PermissionAdapter,
{
    while let Some(task) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };
        let ctx = Arc::clone(&ctx);
        tracker.spawn(async move {
            ctx.run(task).await;
            drop(permit);
        });
    }
}

impl<R: ContainerRuntime, P: PermissionAdapter> MonitorContext<R, P> {
    async fn run(&self, task: MonitorTask) {
        let started = Instant::now();
        let job_id = task.job_id.as_str();
        tracing::info!(job_id, container = task.container_id.short(), "monitoring container exit");

        match self.runtime.wait_for_exit(&task.container_id).await {
            Ok(code) => {
                tracing::info!(job_id, exit_code = code, elapsed_ms = started.elapsed().as_millis() as u64, "container exited");
            }
            Err(ContainerError::NotFound(_)) => {
                tracing::info!(job_id, "container already gone");
            }
            Err(e) => {
                // The container may still be running; keep the pending record for recovery.
                tracing::error!(job_id, error = %e, "failed waiting for container exit");
                return;
            }
        }

        tracing::debug!(job_id, delay_ms = self.settle_delay.as_millis() as u64, "settling before authoritative pass");
        tokio::time::sleep(self.settle_delay).await;

        match self.reconciler.apply(&task.job_dir, &task.ownership).await {
            Ok(changes) => {
                tracing::info!(job_id, changes = ?changes, "authoritative permission pass applied");
            }
            Err(e) => {
                tracing::error!(job_id, path = %task.job_dir.display(), error = %e, "authoritative permission pass failed");
            }
        }

        if let Err(e) = self.store.remove_pending(job_id) {
            tracing::warn!(job_id, error = %e, "failed to clear pending reconciliation");
        }
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
