// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Permission reconciler.
//!
//! Applies a job's requested ownership and mode to its output tree. Runs
//! twice per job: best-effort right after start, and authoritatively after
//! the container exits. Both passes are idempotent.

use std::path::{Path, PathBuf};

use sj_adapters::{PermissionAdapter, PermissionError};
use sj_core::Ownership;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("path does not exist: {}", .0.display())]
    NotFound(PathBuf),
    #[error(transparent)]
    Permission(PermissionError),
}

impl From<PermissionError> for ReconcileError {
    fn from(e: PermissionError) -> Self {
        match e {
            PermissionError::NotFound(path) => Self::NotFound(path),
            other => Self::Permission(other),
        }
    }
}

/// Applies [`Ownership`] to directory trees through a [`PermissionAdapter`].
#[derive(Clone)]
pub struct Reconciler<P: PermissionAdapter> {
    permissions: P,
}

impl<P: PermissionAdapter> Reconciler<P> {
    pub fn new(permissions: P) -> Self {
        Self { permissions }
    }

    pub fn permissions(&self) -> &P {
        &self.permissions
    }

    /// Apply `ownership` recursively below `path`.
    ///
    /// Returns descriptions of the applied changes; empty when nothing was
    /// requested. The path must exist even then.
    pub async fn apply(&self, path: &Path, ownership: &Ownership) -> Result<Vec<String>, ReconcileError> {
        if tokio::fs::symlink_metadata(path).await.is_err() {
            return Err(ReconcileError::NotFound(path.to_path_buf()));
        }

        if let Some(spec) = ownership.chown_spec() {
            self.permissions.chown_recursive(path, &spec).await?;
        }
        if let Some(mode) = ownership.mode {
            self.permissions.chmod_recursive(path, mode).await?;
        }

        let changes = ownership.describe();
        if !changes.is_empty() {
            tracing::debug!(path = %path.display(), changes = ?changes, "reconciled permissions");
        }
        Ok(changes)
    }
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;
