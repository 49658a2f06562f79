// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host permission adapter: recursive ownership and mode changes.
//!
//! Ownership goes through the `chown` binary so user and group names resolve
//! the same way they do for an operator at a shell. Modes are applied by a
//! native walk (see [`mode`]).

pub mod mode;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sj_core::FileMode;
use thiserror::Error;
use tokio::process::Command;

use crate::subprocess::{run_with_timeout, stderr_text, CHOWN_TIMEOUT};

/// Errors from permission changes
#[derive(Debug, Error)]
pub enum PermissionError {
    #[error("path does not exist: {}", .0.display())]
    NotFound(PathBuf),
    #[error("chown {spec} failed: {message}")]
    Chown { spec: String, message: String },
    #[error("chmod failed on {}: {source}", path.display())]
    Chmod {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Adapter for changing ownership and modes of a directory tree
#[async_trait]
pub trait PermissionAdapter: Clone + Send + Sync + 'static {
    /// Recursively change ownership; `spec` is `owner`, `:group` or `owner:group`.
    async fn chown_recursive(&self, path: &Path, spec: &str) -> Result<(), PermissionError>;

    /// Recursively apply `mode` to files and `mode | 0o111` to directories.
    async fn chmod_recursive(&self, path: &Path, mode: FileMode) -> Result<(), PermissionError>;
}

/// Arguments for a recursive chown. `--` ends option parsing so a spec
/// can never be read as a chown flag.
pub fn chown_args(spec: &str, path: &Path) -> Vec<OsString> {
    vec!["-R".into(), "--".into(), spec.into(), path.as_os_str().to_os_string()]
}

/// Applies changes to the real host filesystem.
#[derive(Clone, Default)]
pub struct HostPermissions;

impl HostPermissions {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PermissionAdapter for HostPermissions {
    async fn chown_recursive(&self, path: &Path, spec: &str) -> Result<(), PermissionError> {
        if tokio::fs::symlink_metadata(path).await.is_err() {
            return Err(PermissionError::NotFound(path.to_path_buf()));
        }

        let mut cmd = Command::new("chown");
        cmd.args(chown_args(spec, path));
        let output = run_with_timeout(cmd, CHOWN_TIMEOUT, "chown").await.map_err(|e| {
            PermissionError::Chown { spec: spec.to_string(), message: e.to_string() }
        })?;

        if output.status.success() {
            tracing::debug!(path = %path.display(), spec, "ownership applied");
            Ok(())
        } else {
            Err(PermissionError::Chown { spec: spec.to_string(), message: stderr_text(&output) })
        }
    }

    async fn chmod_recursive(&self, path: &Path, mode: FileMode) -> Result<(), PermissionError> {
        let root = path.to_path_buf();
        let result = tokio::task::spawn_blocking(move || mode::apply_recursive(&root, mode)).await;
        match result {
            Ok(r) => r,
            Err(e) => Err(PermissionError::Chmod {
                path: path.to_path_buf(),
                source: std::io::Error::other(e.to_string()),
            }),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakePermissionAdapter, PermissionCall};

#[cfg(test)]
#[path = "permissions_tests.rs"]
mod tests;
