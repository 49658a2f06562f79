// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status inferencer: inspects a job directory and classifies it.
//!
//! Holds no state between calls. Facts are gathered fresh and handed to
//! [`sj_core::infer`].

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sj_core::{infer, log_path, report_path, Clock, InferredStatus, JobId, StatusFacts};

/// A file found in a completed job's directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputFile {
    pub name: String,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

/// Result of a status query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobStatus {
    pub job_id: JobId,
    pub status: InferredStatus,
    pub job_dir: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<OutputFile>,
    /// Container state as reported by the runtime, when it could be asked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
}

#[derive(Clone)]
pub struct StatusInferencer<C: Clock> {
    clock: C,
    stale_after: Duration,
}

impl<C: Clock> StatusInferencer<C> {
    pub fn new(clock: C, stale_after: Duration) -> Self {
        Self { clock, stale_after }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub async fn status(&self, job_id: &JobId, job_dir: &Path) -> JobStatus {
        let facts = gather_facts(job_id.as_str(), job_dir).await;
        let inference = infer(facts, self.clock.now(), self.stale_after);

        let outputs = if inference.status == InferredStatus::Completed {
            list_outputs(job_dir).await
        } else {
            Vec::new()
        };

        JobStatus {
            job_id: job_id.clone(),
            status: inference.status,
            job_dir: job_dir.to_path_buf(),
            report: inference.report,
            error: inference.error,
            outputs,
            container: None,
        }
    }
}

/// Examine the job directory. Unreadable entries count as absent.
pub async fn gather_facts(job_id: &str, job_dir: &Path) -> StatusFacts {
    let dir_exists = tokio::fs::metadata(job_dir).await.map(|m| m.is_dir()).unwrap_or(false);
    if !dir_exists {
        return StatusFacts::default();
    }

    let report = match tokio::fs::read(report_path(job_dir, job_id)).await {
        Ok(bytes) => Some(serde_json::from_slice(&bytes).map_err(|e| e.to_string())),
        Err(_) => None,
    };

    let log_modified = tokio::fs::metadata(log_path(job_dir, job_id))
        .await
        .ok()
        .filter(|m| m.is_file())
        .and_then(|m| m.modified().ok());

    StatusFacts { dir_exists, report, log_modified }
}

/// Regular files directly inside `job_dir`, sorted by name.
pub async fn list_outputs(job_dir: &Path) -> Vec<OutputFile> {
    let mut outputs = Vec::new();
    let Ok(mut entries) = tokio::fs::read_dir(job_dir).await else {
        return outputs;
    };
    while let Ok(Some(entry)) = entries.next_entry().await {
        let Ok(meta) = entry.metadata().await else {
            continue;
        };
        if !meta.is_file() {
            continue;
        }
        outputs.push(OutputFile {
            name: entry.file_name().to_string_lossy().into_owned(),
            size: meta.len(),
            modified: meta.modified().ok().map(to_utc),
        });
    }
    outputs.sort_by(|a, b| a.name.cmp(&b.name));
    outputs
}

pub(crate) fn to_utc(time: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(time)
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
