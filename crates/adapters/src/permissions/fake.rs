// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recording permission adapter for tests.
//!
//! Nothing touches the filesystem except the existence check, so tests can
//! exercise ownership changes without privileges.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use sj_core::FileMode;

use super::{PermissionAdapter, PermissionError};

/// Recorded permission call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionCall {
    Chown { path: PathBuf, spec: String },
    Chmod { path: PathBuf, mode: FileMode },
}

#[derive(Default)]
struct FakePermissionState {
    calls: Vec<PermissionCall>,
    failures_left: usize,
    owners: HashMap<PathBuf, String>,
    modes: HashMap<PathBuf, FileMode>,
}

/// Fake permission adapter for testing
#[derive(Clone, Default)]
pub struct FakePermissionAdapter {
    inner: Arc<Mutex<FakePermissionState>>,
}

impl FakePermissionAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<PermissionCall> {
        self.inner.lock().calls.clone()
    }

    /// Fail the next `n` calls as if the user did not exist.
    pub fn fail_next(&self, n: usize) {
        self.inner.lock().failures_left = n;
    }

    /// Last ownership spec applied to `path`.
    pub fn owner_of(&self, path: &Path) -> Option<String> {
        self.inner.lock().owners.get(path).cloned()
    }

    /// Last mode applied to `path`.
    pub fn mode_of(&self, path: &Path) -> Option<FileMode> {
        self.inner.lock().modes.get(path).copied()
    }

    fn take_failure(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.failures_left > 0 {
            inner.failures_left -= 1;
            true
        } else {
            false
        }
    }
}

#[async_trait]
impl PermissionAdapter for FakePermissionAdapter {
    async fn chown_recursive(&self, path: &Path, spec: &str) -> Result<(), PermissionError> {
        self.inner
            .lock()
            .calls
            .push(PermissionCall::Chown { path: path.to_path_buf(), spec: spec.to_string() });
        if !path.exists() {
            return Err(PermissionError::NotFound(path.to_path_buf()));
        }
        if self.take_failure() {
            return Err(PermissionError::Chown {
                spec: spec.to_string(),
                message: "invalid user".to_string(),
            });
        }
        self.inner.lock().owners.insert(path.to_path_buf(), spec.to_string());
        Ok(())
    }

    async fn chmod_recursive(&self, path: &Path, mode: FileMode) -> Result<(), PermissionError> {
        self.inner.lock().calls.push(PermissionCall::Chmod { path: path.to_path_buf(), mode });
        if !path.exists() {
            return Err(PermissionError::NotFound(path.to_path_buf()));
        }
        if self.take_failure() {
            return Err(PermissionError::Chmod {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            });
        }
        self.inner.lock().modes.insert(path.to_path_buf(), mode);
        Ok(())
    }
}
