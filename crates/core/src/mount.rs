// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Volume mount plans for job containers.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Access mode of a bind mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindMode {
    Ro,
    Rw,
}

crate::wire_names! {
    BindMode {
        Ro => "ro",
        Rw => "rw",
    }
}

/// One host directory or file bound into the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bind {
    pub host: PathBuf,
    pub container: PathBuf,
    pub mode: BindMode,
}

impl Bind {
    pub fn read_only(host: impl Into<PathBuf>, container: impl Into<PathBuf>) -> Self {
        Self { host: host.into(), container: container.into(), mode: BindMode::Ro }
    }

    pub fn read_write(host: impl Into<PathBuf>, container: impl Into<PathBuf>) -> Self {
        Self { host: host.into(), container: container.into(), mode: BindMode::Rw }
    }

    /// `host:container:mode`, as accepted by `docker run -v`.
    pub fn volume_arg(&self) -> String {
        format!("{}:{}:{}", self.host.display(), self.container.display(), self.mode)
    }
}

/// Ordered list of binds for one container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MountPlan {
    binds: Vec<Bind>,
}

impl MountPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bind: Bind) {
        self.binds.push(bind);
    }

    pub fn binds(&self) -> &[Bind] {
        &self.binds
    }

    pub fn len(&self) -> usize {
        self.binds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.binds.is_empty()
    }

    /// Binds whose container path contains `container_path`.
    pub fn covering(&self, container_path: &Path) -> Vec<&Bind> {
        self.binds.iter().filter(|b| container_path.starts_with(&b.container)).collect()
    }

    /// `-v` arguments for every bind, in plan order.
    pub fn volume_args(&self) -> Vec<String> {
        self.binds.iter().map(Bind::volume_arg).collect()
    }
}

impl<'a> IntoIterator for &'a MountPlan {
    type Item = &'a Bind;
    type IntoIter = std::slice::Iter<'a, Bind>;

    fn into_iter(self) -> Self::IntoIter {
        self.binds.iter()
    }
}
