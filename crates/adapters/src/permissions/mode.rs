// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recursive mode application.
//!
//! Directories are visited after their children so a restrictive mode on a
//! parent never blocks the walk. Symlinks are left alone: their target may
//! live outside the tree.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use sj_core::FileMode;

use super::PermissionError;

/// Apply `mode` below and including `root`. Blocking.
pub fn apply_recursive(root: &Path, mode: FileMode) -> Result<(), PermissionError> {
    let meta = match fs::symlink_metadata(root) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(PermissionError::NotFound(root.to_path_buf()))
        }
        Err(source) => return Err(PermissionError::Chmod { path: root.to_path_buf(), source }),
    };
    visit(root, &meta, mode)
}

fn visit(path: &Path, meta: &fs::Metadata, mode: FileMode) -> Result<(), PermissionError> {
    let file_type = meta.file_type();
    if file_type.is_symlink() {
        return Ok(());
    }

    if file_type.is_dir() {
        let entries = fs::read_dir(path).map_err(|source| chmod_err(path, source))?;
        for entry in entries {
            let entry = entry.map_err(|source| chmod_err(path, source))?;
            let child = entry.path();
            let child_meta = fs::symlink_metadata(&child).map_err(|source| chmod_err(&child, source))?;
            visit(&child, &child_meta, mode)?;
        }
        set_mode(path, mode.dir_mode())
    } else {
        set_mode(path, mode.file_mode())
    }
}

fn set_mode(path: &Path, bits: u32) -> Result<(), PermissionError> {
    fs::set_permissions(path, fs::Permissions::from_mode(bits)).map_err(|source| chmod_err(path, source))
}

fn chmod_err(path: &Path, source: std::io::Error) -> PermissionError {
    PermissionError::Chmod { path: path.to_path_buf(), source }
}

#[cfg(test)]
#[path = "mode_tests.rs"]
mod tests;
