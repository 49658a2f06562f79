// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job launcher: the coordinator behind every `sj` command.
//!
//! A launch runs its phases strictly in order:
//!
//! 1. validate and plan (no side effects on failure)
//! 2. reject duplicate ids
//! 3. create `<output>/<job_id>`
//! 4. start the container (nothing is recorded if this fails)
//! 5. record the job in the index; the container is stopped if that fails
//! 6. best-effort permission pass, awaited, failures logged
//! 7. record a pending reconciliation and hand it to the monitor pool
//!
//! Steps 6 and 7 are skipped when the request asks for no ownership change.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sj_adapters::{ContainerError, ContainerRuntime, ContainerSpec, PermissionAdapter};
use sj_core::{log_path, plan, report_path, Clock, ContainerId, JobId, JobRequest, Ownership, PlannerConfig};
use sj_storage::{JobRecord, JobStore, PendingReconcile};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::monitor::{MonitorPool, MonitorTask};
use crate::reconciler::Reconciler;
use crate::status::{to_utc, JobStatus, StatusInferencer};

/// Lines returned by [`Launcher::logs`] when no count is given.
pub const DEFAULT_LOG_LINES: usize = 50;

const UNCHANGED: &str = "unchanged";

/// What a launch reports back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchReceipt {
    pub job_id: JobId,
    pub container_id: ContainerId,
    pub host_output_path: PathBuf,
    pub container_output_path: PathBuf,
    pub job_dir: PathBuf,
    pub created_at: DateTime<Utc>,
    pub owner: String,
    pub group: String,
    pub permissions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// How much of a job's log to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRequest {
    Tail(usize),
    Full,
}

impl Default for LogRequest {
    fn default() -> Self {
        Self::Tail(DEFAULT_LOG_LINES)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogTail {
    pub job_id: JobId,
    pub text: String,
    pub lines_returned: usize,
    pub total_lines: usize,
    pub file_size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub job_id: JobId,
    pub removed_dir: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteAllOutcome {
    pub jobs_removed: usize,
    pub dirs_removed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecoverySummary {
    /// Containers still alive; a monitor was re-attached.
    pub reattached: Vec<JobId>,
    /// Containers already gone; the pass runs after the settle delay.
    pub replayed: Vec<JobId>,
    /// Entries that could not be queued and remain pending.
    pub deferred: Vec<JobId>,
}

/// Coordinates planning, the container runtime, the job index and the
/// permission passes.
pub struct Launcher<R: ContainerRuntime, P: PermissionAdapter, C: Clock> {
    planner: PlannerConfig,
    image: String,
    output_base: PathBuf,
    runtime: R,
    reconciler: Reconciler<P>,
    store: JobStore,
    inferencer: StatusInferencer<C>,
    monitors: MonitorPool,
}

impl<R, P, C> Launcher<R, P, C>
where
    R: ContainerRuntime,
    P: PermissionAdapter,
    C: Clock,
{
    /// Build a launcher and start its monitor pool. Must be called inside a
    /// tokio runtime.
    pub fn new(config: &EngineConfig, runtime: R, permissions: P, store: JobStore, clock: C) -> Self {
        let reconciler = Reconciler::new(permissions);
        let monitors = MonitorPool::spawn(
            runtime.clone(),
            reconciler.clone(),
            store.clone(),
            config.monitor_settings(),
        );
        Self {
            planner: config.planner(),
            image: config.image.clone(),
            output_base: config.output_base.clone(),
            runtime,
            reconciler,
            store,
            inferencer: StatusInferencer::new(clock, config.stale_after),
            monitors,
        }
    }

    pub fn store(&self) -> &JobStore {
        &self.store
    }

    pub fn monitors(&self) -> &MonitorPool {
        &self.monitors
    }

    /// Launch a job. Returns once the container has started; the
    /// authoritative permission pass happens later in the monitor pool.
    pub async fn launch(&self, request: JobRequest) -> Result<LaunchReceipt, EngineError> {
        let request = request.ensure_id();
        let plan = plan(&request, &self.planner)?;
        let job_id = plan.job_id.clone();

        if self.store.contains(job_id.as_str())? {
            return Err(EngineError::Conflict(job_id.to_string()));
        }

        tokio::fs::create_dir_all(&plan.job_dir)
            .await
            .map_err(|e| EngineError::io(&plan.job_dir, e))?;

        let spec = ContainerSpec {
            job_id: job_id.clone(),
            image: self.image.clone(),
            args: plan.args.clone(),
            mounts: plan.mounts.clone(),
        };
        let container_id = match self.runtime.start(&spec).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(job_id = %job_id, error = %e, "container start failed");
                return Err(EngineError::Orchestration(e));
            }
        };

        let record = JobRecord {
            job_id: job_id.clone(),
            container_id: container_id.clone(),
            output_path: plan.host_output_path.clone(),
            job_dir: plan.job_dir.clone(),
            ownership: plan.ownership.clone(),
            image: self.image.clone(),
            created_at: to_utc(self.inferencer.clock().now()),
        };
        match self.store.insert_new(record.clone()) {
            Ok(true) => {}
            Ok(false) => {
                // Another process recorded the same id while this container started.
                self.discard_container(&job_id, &container_id).await;
                return Err(EngineError::Conflict(job_id.to_string()));
            }
            Err(e) => {
                self.discard_container(&job_id, &container_id).await;
                return Err(e.into());
            }
        }
        tracing::info!(
            job_id = %job_id,
            container = container_id.short(),
            output = %plan.host_output_path.display(),
            "job launched"
        );

        if !plan.ownership.is_empty() {
            self.schedule_reconciliation(&record).await;
        }

        Ok(receipt(&record, plan.container_output_path))
    }

    /// Stop a started container that could not be recorded.
    async fn discard_container(&self, job_id: &JobId, container_id: &ContainerId) {
        match self.runtime.stop(container_id).await {
            Ok(()) => tracing::warn!(job_id = %job_id, container = container_id.short(), "stopped unrecorded container"),
            Err(e) => tracing::error!(
                job_id = %job_id,
                container = container_id.short(),
                error = %e,
                "failed to stop unrecorded container"
            ),
        }
    }

    async fn schedule_reconciliation(&self, record: &JobRecord) {
        let job_id = record.job_id.as_str();

        // The job dir may still be empty; failures here never fail the launch.
        match self.reconciler.apply(&record.job_dir, &record.ownership).await {
            Ok(changes) => tracing::info!(job_id, changes = ?changes, "best-effort permission pass applied"),
            Err(e) => tracing::warn!(job_id, error = %e, "best-effort permission pass failed"),
        }

        let pending = PendingReconcile::for_record(record, record.created_at);
        if let Err(e) = self.store.add_pending(pending.clone()) {
            tracing::warn!(job_id, error = %e, "failed to persist pending reconciliation");
        }
        if let Err(e) = self.monitors.submit(MonitorTask::from(pending)) {
            tracing::warn!(job_id, error = %e, "exit monitor not started, left pending for recovery");
        }
    }

    fn record(&self, job_id: &str) -> Result<JobRecord, EngineError> {
        self.store.get(job_id)?.ok_or_else(|| EngineError::job_not_found(job_id))
    }

    /// Inferred status, plus the container's runtime state when available.
    pub async fn status(&self, job_id: &str) -> Result<JobStatus, EngineError> {
        let record = self.record(job_id)?;
        let mut status = self.inferencer.status(&record.job_id, &record.job_dir).await;
        match self.runtime.inspect_status(&record.container_id).await {
            Ok(state) => status.container = Some(state.to_string()),
            Err(e) => tracing::debug!(job_id, error = %e, "container inspect failed"),
        }
        Ok(status)
    }

    /// Tail (or all) of the job's log file.
    pub async fn logs(&self, job_id: &str, request: LogRequest) -> Result<LogTail, EngineError> {
        let record = self.record(job_id)?;
        let path = log_path(&record.job_dir, job_id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(EngineError::NotFound(format!("log file not found for job {}", job_id)))
            }
            Err(e) => return Err(EngineError::io(path, e)),
        };

        let file_size = bytes.len() as u64;
        let content = String::from_utf8_lossy(&bytes);
        let lines: Vec<&str> = content.lines().collect();
        let total_lines = lines.len();
        let selected = match request {
            LogRequest::Full => &lines[..],
            LogRequest::Tail(n) => &lines[total_lines.saturating_sub(n)..],
        };

        Ok(LogTail {
            job_id: record.job_id,
            text: selected.join("\n"),
            lines_returned: selected.len(),
            total_lines,
            file_size,
        })
    }

    /// The parsed report of a completed job.
    pub async fn report(&self, job_id: &str) -> Result<serde_json::Value, EngineError> {
        let record = self.record(job_id)?;
        let path = report_path(&record.job_dir, job_id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(EngineError::NotFound(format!("report not found for job {}", job_id)))
            }
            Err(e) => return Err(EngineError::io(path, e)),
        };
        serde_json::from_slice(&bytes).map_err(|e| EngineError::Report { path, message: e.to_string() })
    }

    /// Stop the job's container. Any pending permission pass still runs.
    pub async fn terminate(&self, job_id: &str) -> Result<(), EngineError> {
        let record = self.record(job_id)?;
        match self.runtime.stop(&record.container_id).await {
            Ok(()) => {
                tracing::info!(job_id, container = record.container_id.short(), "job terminated");
                Ok(())
            }
            Err(ContainerError::NotFound(_)) => {
                Err(EngineError::NotFound(format!("container for job {} is not running", job_id)))
            }
            Err(e) => Err(EngineError::Orchestration(e)),
        }
    }

    /// Forget a job and remove its directory.
    ///
    /// Directory removal is best-effort; the index entry is always removed.
    pub async fn delete(&self, job_id: &str) -> Result<DeleteOutcome, EngineError> {
        let record = self.store.delete(job_id)?.ok_or_else(|| EngineError::job_not_found(job_id))?;
        let removed_dir = match tokio::fs::remove_dir_all(&record.job_dir).await {
            Ok(()) => true,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(job_id, path = %record.job_dir.display(), error = %e, "failed to remove job directory");
                }
                false
            }
        };
        tracing::info!(job_id, removed_dir, "job deleted");
        Ok(DeleteOutcome { job_id: record.job_id, removed_dir })
    }

    /// Forget every job and remove every directory under the output base.
    ///
    /// The output base itself is kept.
    pub async fn delete_all(&self, confirm: bool) -> Result<DeleteAllOutcome, EngineError> {
        if !confirm {
            return Err(EngineError::ConfirmationRequired);
        }
        let jobs_removed = self.store.delete_all()?;

        let mut dirs_removed = 0;
        match tokio::fs::read_dir(&self.output_base).await {
            Ok(mut entries) => {
                while let Some(entry) =
                    entries.next_entry().await.map_err(|e| EngineError::io(&self.output_base, e))?
                {
                    let path = entry.path();
                    let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
                    if !is_dir {
                        continue;
                    }
                    match tokio::fs::remove_dir_all(&path).await {
                        Ok(()) => dirs_removed += 1,
                        Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to remove output directory"),
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(EngineError::io(&self.output_base, e)),
        }

        tracing::info!(jobs_removed, dirs_removed, "all jobs deleted");
        Ok(DeleteAllOutcome { jobs_removed, dirs_removed })
    }

    /// Index entries, newest first.
    pub fn list(&self) -> Result<Vec<JobRecord>, EngineError> {
        Ok(self.store.list()?)
    }

    /// Replay pending reconciliations left by an earlier process.
    pub async fn recover(&self) -> Result<RecoverySummary, EngineError> {
        let mut summary = RecoverySummary::default();
        for pending in self.store.pending()? {
            let job_id = pending.job_id.clone();
            let alive = match self.runtime.inspect_status(&pending.container_id).await {
                Ok(state) => state.is_alive(),
                Err(e) => {
                    tracing::warn!(job_id = %job_id, error = %e, "container inspect failed during recovery");
                    false
                }
            };
            match self.monitors.submit(MonitorTask::from(pending)) {
                Ok(()) if alive => summary.reattached.push(job_id),
                Ok(()) => summary.replayed.push(job_id),
                Err(e) => {
                    tracing::warn!(job_id = %job_id, error = %e, "pending reconciliation deferred");
                    summary.deferred.push(job_id);
                }
            }
        }
        tracing::info!(
            reattached = summary.reattached.len(),
            replayed = summary.replayed.len(),
            deferred = summary.deferred.len(),
            "recovery submitted"
        );
        Ok(summary)
    }

    /// Wait for every queued and running monitor to finish.
    pub async fn shutdown(self) {
        self.monitors.shutdown().await;
    }
}

fn receipt(record: &JobRecord, container_output_path: PathBuf) -> LaunchReceipt {
    let Ownership { owner, group, mode } = &record.ownership;
    let note = (!record.ownership.is_empty())
        .then(|| "permissions are finalised after the job completes".to_string());
    LaunchReceipt {
        job_id: record.job_id.clone(),
        container_id: record.container_id.clone(),
        host_output_path: record.output_path.clone(),
        container_output_path,
        job_dir: record.job_dir.clone(),
        created_at: record.created_at,
        owner: owner.clone().unwrap_or_else(|| UNCHANGED.to_string()),
        group: group.clone().unwrap_or_else(|| UNCHANGED.to_string()),
        permissions: mode.map(|m| m.to_string()).unwrap_or_else(|| UNCHANGED.to_string()),
        note,
    }
}

#[cfg(test)]
#[path = "launcher_tests.rs"]
mod tests;
