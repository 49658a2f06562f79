// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command and mount planning.
//!
//! [`plan`] turns a [`JobRequest`] into the container's argument vector and
//! the binds it needs. It performs no I/O, so the same request and config
//! always yield the same plan.
//!
//! # Mount layout
//!
//! ```text
//! <env_file>          -> /app/.env            ro   (when configured)
//! parent(<output>)    -> parent(<output>)     rw   (same path on both sides)
//! dirname(<file>)     -> /app/input_files     ro   (absolute --file only)
//! ```
//!
//! The output bind covers the parent so the workload can create siblings of
//! the output directory; identical paths keep host-side inspection trivial.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::id::JobId;
use crate::mount::{Bind, MountPlan};
use crate::ownership::Ownership;
use crate::request::{JobRequest, ValidationError};

/// Container directory holding host input files.
pub const CONTAINER_INPUT_DIR: &str = "/app/input_files";

/// Container path of the workload's env file.
pub const CONTAINER_ENV_FILE: &str = "/app/.env";

/// Workload root inside the image; output binds must stay clear of it.
pub const CONTAINER_APP_DIR: &str = "/app";

/// Host-side settings the planner needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Base directory for requests that do not name an output directory.
    pub output_base: PathBuf,
    /// Host env file bound read-only into the container.
    pub env_file: Option<PathBuf>,
}

impl PlannerConfig {
    pub fn new(output_base: impl Into<PathBuf>) -> Self {
        Self { output_base: output_base.into(), env_file: None }
    }

    crate::setters! {
        env_file: Option<PathBuf>,
    }
}

/// Everything needed to start one job's container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPlan {
    pub job_id: JobId,
    /// Arguments passed to the image entrypoint.
    pub args: Vec<String>,
    pub mounts: MountPlan,
    /// Directory passed as `--output`.
    pub host_output_path: PathBuf,
    pub container_output_path: PathBuf,
    /// `<output>/<job_id>`, where the workload writes its artifacts.
    pub job_dir: PathBuf,
    pub ownership: Ownership,
}

/// The directory bound read-write for `output`: its parent.
///
/// Rejects outputs whose parent would be `/` or would overlap `/app`, and
/// outputs with `.` or `..` components, since either lets the rw bind
/// shadow the workload or reach outside the intended tree.
fn output_bind_root(output: &Path) -> Result<&Path, ValidationError> {
    let unsafe_output = || ValidationError::UnsafeOutput(output.display().to_string());
    if output.components().any(|c| matches!(c, Component::CurDir | Component::ParentDir)) {
        return Err(unsafe_output());
    }
    let parent = match output.parent() {
        Some(parent) if parent != Path::new("/") && !parent.as_os_str().is_empty() => parent,
        _ => return Err(unsafe_output()),
    };
    let app = Path::new(CONTAINER_APP_DIR);
    if parent.starts_with(app) || app.starts_with(parent) {
        return Err(unsafe_output());
    }
    Ok(parent)
}

/// Plan the container command and binds for a request.
///
/// The request must already carry an id (see [`JobRequest::ensure_id`]).
pub fn plan(request: &JobRequest, config: &PlannerConfig) -> Result<JobPlan, ValidationError> {
    let validated = request.validate()?;
    let job_id = validated.id;

    let host_output_path =
        request.output.clone().unwrap_or_else(|| config.output_base.join(job_id.as_str()));
    let container_output_path = host_output_path.clone();
    let job_dir = host_output_path.join(job_id.as_str());

    let mut mounts = MountPlan::new();
    if let Some(ref env_file) = config.env_file {
        mounts.push(Bind::read_only(env_file, CONTAINER_ENV_FILE));
    }
    let output_parent = output_bind_root(&host_output_path)?;
    mounts.push(Bind::read_write(output_parent, output_parent));

    let mut args = vec!["--id".to_string(), job_id.to_string()];

    if let Some(source) = validated.source {
        args.extend(["--source".to_string(), source.to_string()]);
        push_opt(&mut args, "--passcode", &request.passcode);
        push_opt(&mut args, "--link", &request.link);
        if request.with_transcription {
            args.push("--with-transcription".to_string());
        }
    } else if let Some(link) = non_empty(&request.link) {
        args.extend(["--link".to_string(), link.to_string()]);
    } else if let Some(file) = non_empty(&request.file) {
        let file_arg = match input_file_bind(Path::new(file))? {
            Some((bind, container_path)) => {
                mounts.push(bind);
                container_path
            }
            None => file.to_string(),
        };
        args.extend(["--file".to_string(), file_arg]);
    }

    push_opt(&mut args, "--language", &request.language);
    if let Some(model) = validated.model {
        args.extend(["--model".to_string(), model.to_string()]);
    }

    if let Some(speakers) = request.speakers.filter(|s| s.is_enabled()) {
        args.push("--speakers".to_string());
        if let Some(count) = speakers.argument() {
            args.push(count);
        }
    }
    push_flag(&mut args, "--transcribe", request.transcribe);
    push_flag(&mut args, "--restore", request.restore);
    push_flag(&mut args, "--timestamps", request.timestamps);
    push_flag(&mut args, "--short_summary", request.short_summary);
    push_flag(&mut args, "--detail_summary", request.detail_summary);
    push_opt(&mut args, "--translate", &request.translate);
    push_flag(&mut args, "--download_audio", request.download_audio);

    args.extend(["--output".to_string(), container_output_path.display().to_string()]);

    Ok(JobPlan {
        job_id,
        args,
        mounts,
        host_output_path,
        container_output_path,
        job_dir,
        ownership: validated.ownership,
    })
}

/// Read-only bind for an absolute input file, plus its path inside the container.
///
/// Relative paths are resolved by the workload itself and need no bind.
fn input_file_bind(file: &Path) -> Result<Option<(Bind, String)>, ValidationError> {
    if !file.is_absolute() {
        return Ok(None);
    }
    let (Some(dir), Some(name)) = (file.parent(), file.file_name()) else {
        return Err(ValidationError::InvalidFile(file.display().to_string()));
    };
    let container_path = Path::new(CONTAINER_INPUT_DIR).join(name);
    Ok(Some((
        Bind::read_only(dir, CONTAINER_INPUT_DIR),
        container_path.display().to_string(),
    )))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn push_opt(args: &mut Vec<String>, flag: &str, value: &Option<String>) {
    if let Some(v) = non_empty(value) {
        args.push(flag.to_string());
        args.push(v.to_string());
    }
}

fn push_flag(args: &mut Vec<String>, flag: &str, enabled: bool) {
    if enabled {
        args.push(flag.to_string());
    }
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
