// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use sj_adapters::ContainerError;
use sj_core::ValidationError;
use sj_storage::StoreError;
use thiserror::Error;

use crate::reconciler::ReconcileError;

/// Errors surfaced by [`crate::Launcher`] operations
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid job request: {0}")]
    Validation(#[from] ValidationError),
    #[error("job {0} already exists")]
    Conflict(String),
    #[error("failed to start container: {0}")]
    Orchestration(#[from] ContainerError),
    #[error("permission reconciliation failed: {0}")]
    Reconciliation(#[from] ReconcileError),
    #[error("{0}")]
    NotFound(String),
    #[error("job store error: {0}")]
    Storage(#[from] StoreError),
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read report {}: {message}", path.display())]
    Report { path: PathBuf, message: String },
    #[error("refusing to delete all jobs without confirmation")]
    ConfirmationRequired,
}

impl EngineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn job_not_found(job_id: &str) -> Self {
        Self::NotFound(format!("job not found: {}", job_id))
    }
}
