// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON-file backed job store.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use fs2::FileExt;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::{JobRecord, PendingReconcile};

/// Current state file schema version
pub const CURRENT_STATE_VERSION: u32 = 1;

/// File name of the state file inside the state directory.
pub const STATE_FILE_NAME: &str = "jobs.json";

/// Advisory lock file guarding the state file across processes.
pub const LOCK_FILE_NAME: &str = "jobs.lock";

static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Errors that can occur in store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt state file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unsupported state file version {0}")]
    Version(u32),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(rename = "v", default = "current_version")]
    version: u32,
    #[serde(default)]
    jobs: BTreeMap<String, JobRecord>,
    #[serde(default)]
    pending: BTreeMap<String, PendingReconcile>,
}

fn current_version() -> u32 {
    CURRENT_STATE_VERSION
}

struct StoreInner {
    path: Option<PathBuf>,
    state: StateFile,
}

/// Job index plus pending reconciliations.
///
/// Cloning shares the same underlying store. Every operation re-reads the
/// state file under `jobs.lock` (shared for reads, exclusive for
/// read-modify-write), so separate `sj` processes never lose each other's
/// updates.
#[derive(Clone)]
pub struct JobStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl JobStore {
    /// Open (or create) the store in `state_dir`.
    pub fn open(state_dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(state_dir)
            .map_err(|source| StoreError::Io { path: state_dir.to_path_buf(), source })?;
        let path = state_dir.join(STATE_FILE_NAME);
        let lock = open_lock(&path)?;
        lock.lock_shared().map_err(|source| lock_error(&path, source))?;
        let state = load(&path)?;
        drop(lock);
        tracing::debug!(path = %path.display(), jobs = state.jobs.len(), "opened job store");
        Ok(Self { inner: Arc::new(Mutex::new(StoreInner { path: Some(path), state })) })
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                path: None,
                state: StateFile { version: CURRENT_STATE_VERSION, ..StateFile::default() },
            })),
        }
    }

    /// Path of the backing file, if any.
    pub fn path(&self) -> Option<PathBuf> {
        self.inner.lock().path.clone()
    }

    pub fn get(&self, job_id: &str) -> Result<Option<JobRecord>, StoreError> {
        self.read(|state| state.jobs.get(job_id).cloned())
    }

    pub fn contains(&self, job_id: &str) -> Result<bool, StoreError> {
        self.read(|state| state.jobs.contains_key(job_id))
    }

    pub fn put(&self, record: JobRecord) -> Result<(), StoreError> {
        self.write(|state| {
            state.jobs.insert(record.job_id.to_string(), record);
        })
    }

    /// Insert `record` unless its id is already taken.
    ///
    /// Returns `false` and leaves the store untouched when the id exists.
    pub fn insert_new(&self, record: JobRecord) -> Result<bool, StoreError> {
        self.write(|state| {
            let key = record.job_id.to_string();
            if state.jobs.contains_key(&key) {
                return false;
            }
            state.jobs.insert(key, record);
            true
        })
    }

    /// Remove one entry, returning it if it existed.
    pub fn delete(&self, job_id: &str) -> Result<Option<JobRecord>, StoreError> {
        self.write(|state| state.jobs.remove(job_id))
    }

    /// Remove every index entry and return how many there were.
    ///
    /// Pending reconciliations are kept; their passes fail on their own once
    /// the directories are gone.
    pub fn delete_all(&self) -> Result<usize, StoreError> {
        self.write(|state| {
            let count = state.jobs.len();
            state.jobs.clear();
            count
        })
    }

    /// All entries, newest first.
    pub fn list(&self) -> Result<Vec<JobRecord>, StoreError> {
        self.read(|state| {
            let mut records: Vec<JobRecord> = state.jobs.values().cloned().collect();
            records.sort_by(|a, b| {
                b.created_at.cmp(&a.created_at).then_with(|| a.job_id.cmp(&b.job_id))
            });
            records
        })
    }

    pub fn add_pending(&self, pending: PendingReconcile) -> Result<(), StoreError> {
        self.write(|state| {
            state.pending.insert(pending.job_id.to_string(), pending);
        })
    }

    pub fn remove_pending(&self, job_id: &str) -> Result<bool, StoreError> {
        self.write(|state| state.pending.remove(job_id).is_some())
    }

    /// Pending reconciliations, oldest first.
    pub fn pending(&self) -> Result<Vec<PendingReconcile>, StoreError> {
        self.read(|state| {
            let mut pending: Vec<PendingReconcile> = state.pending.values().cloned().collect();
            pending.sort_by(|a, b| a.queued_at.cmp(&b.queued_at));
            pending
        })
    }

    fn read<T>(&self, f: impl FnOnce(&StateFile) -> T) -> Result<T, StoreError> {
        let mut inner = self.inner.lock();
        if let Some(path) = inner.path.clone() {
            let lock = open_lock(&path)?;
            lock.lock_shared().map_err(|source| lock_error(&path, source))?;
            inner.state = load(&path)?;
        }
        Ok(f(&inner.state))
    }

    fn write<T>(&self, f: impl FnOnce(&mut StateFile) -> T) -> Result<T, StoreError> {
        let mut inner = self.inner.lock();
        let Some(path) = inner.path.clone() else {
            return Ok(f(&mut inner.state));
        };
        // Held until the renamed file is in place; released on drop.
        let lock = open_lock(&path)?;
        lock.lock_exclusive().map_err(|source| lock_error(&path, source))?;

        let mut state = load(&path)?;
        let result = f(&mut state);
        save(&path, &state)?;
        inner.state = state;
        Ok(result)
    }
}

fn lock_path(state_path: &Path) -> PathBuf {
    state_path.with_file_name(LOCK_FILE_NAME)
}

fn open_lock(state_path: &Path) -> Result<File, StoreError> {
    let path = lock_path(state_path);
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&path)
        .map_err(|source| StoreError::Io { path, source })
}

fn lock_error(state_path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io { path: lock_path(state_path), source }
}

fn load(path: &Path) -> Result<StateFile, StoreError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(StateFile { version: CURRENT_STATE_VERSION, ..StateFile::default() })
        }
        Err(source) => return Err(StoreError::Io { path: path.to_path_buf(), source }),
    };
    let state: StateFile = serde_json::from_slice(&bytes)
        .map_err(|source| StoreError::Json { path: path.to_path_buf(), source })?;
    if state.version > CURRENT_STATE_VERSION {
        return Err(StoreError::Version(state.version));
    }
    Ok(state)
}

/// Write to a uniquely named sibling temp file and rename over the target.
fn save(path: &Path, state: &StateFile) -> Result<(), StoreError> {
    let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let tmp_path = path.with_extension(format!("json.{}.{}.tmp", std::process::id(), seq));
    let json = serde_json::to_vec_pretty(state)
        .map_err(|source| StoreError::Json { path: path.to_path_buf(), source })?;
    let result = fs::write(&tmp_path, json).and_then(|_| fs::rename(&tmp_path, path));
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result.map_err(|source| StoreError::Io { path: path.to_path_buf(), source })
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
