// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sj_core::{ContainerId, JobId, Ownership};

/// Index entry for a launched job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_id: JobId,
    pub container_id: ContainerId,
    /// Output directory passed to the workload.
    pub output_path: PathBuf,
    /// `<output_path>/<job_id>`, where the workload writes its artifacts.
    pub job_dir: PathBuf,
    #[serde(default)]
    pub ownership: Ownership,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

/// An authoritative reconciliation that has been scheduled but not finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingReconcile {
    pub job_id: JobId,
    pub container_id: ContainerId,
    pub job_dir: PathBuf,
    pub ownership: Ownership,
    pub queued_at: DateTime<Utc>,
}

impl PendingReconcile {
    pub fn for_record(record: &JobRecord, queued_at: DateTime<Utc>) -> Self {
        Self {
            job_id: record.job_id.clone(),
            container_id: record.container_id.clone(),
            job_dir: record.job_dir.clone(),
            ownership: record.ownership.clone(),
            queued_at,
        }
    }
}
