// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Requested ownership and permission mode for a job's output tree.

use serde::{Deserialize, Serialize};

/// Execute bits OR-ed into directory modes so directories stay traversable.
pub const DIR_EXEC_BITS: u32 = 0o111;

/// Largest mode accepted (setuid/setgid/sticky plus rwx for all).
const MAX_MODE: u32 = 0o7777;

/// A permission mode given in octal notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileMode(u32);

impl FileMode {
    pub fn new(bits: u32) -> Option<Self> {
        (bits <= MAX_MODE).then_some(Self(bits))
    }

    /// Parse `"644"`, `"0644"` or `"0o644"` as an octal mode.
    pub fn parse_octal(s: &str) -> Option<Self> {
        let s = s.trim();
        let digits = s.strip_prefix("0o").unwrap_or(s);
        if digits.is_empty() {
            return None;
        }
        u32::from_str_radix(digits, 8).ok().and_then(Self::new)
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Mode for regular files under recursive application.
    pub fn file_mode(&self) -> u32 {
        self.0
    }

    /// Mode for directories under recursive application.
    pub fn dir_mode(&self) -> u32 {
        self.0 | DIR_EXEC_BITS
    }
}

impl std::fmt::Display for FileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:o}", self.0)
    }
}

/// Requested owner, group and mode. Every field is independent and optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownership {
    pub owner: Option<String>,
    pub group: Option<String>,
    pub mode: Option<FileMode>,
}

impl Ownership {
    /// True when nothing was requested; reconciliation is then a no-op.
    pub fn is_empty(&self) -> bool {
        self.owner.is_none() && self.group.is_none() && self.mode.is_none()
    }

    /// Argument for `chown`: `owner`, `:group` or `owner:group`.
    pub fn chown_spec(&self) -> Option<String> {
        match (&self.owner, &self.group) {
            (Some(o), Some(g)) => Some(format!("{}:{}", o, g)),
            (Some(o), None) => Some(o.clone()),
            (None, Some(g)) => Some(format!(":{}", g)),
            (None, None) => None,
        }
    }

    /// Human-readable descriptions of the requested changes.
    pub fn describe(&self) -> Vec<String> {
        let mut changes = Vec::new();
        if let Some(ref owner) = self.owner {
            changes.push(format!("owner to {}", owner));
        }
        if let Some(ref group) = self.group {
            changes.push(format!("group to {}", group));
        }
        if let Some(mode) = self.mode {
            changes.push(format!("permissions to {}", mode));
        }
        changes
    }
}

#[cfg(test)]
#[path = "ownership_tests.rs"]
mod tests;
