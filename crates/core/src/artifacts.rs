// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Artifact naming inside a job directory.
//!
//! The workload writes both files directly inside `<output>/<job_id>/`:
//!
//! ```text
//! <job_id>.log           progress log, touched while the job runs
//! report_<job_id>.json   final report, written once on completion
//! ```

use std::path::{Path, PathBuf};

pub fn log_file_name(job_id: &str) -> String {
    format!("{}.log", job_id)
}

pub fn report_file_name(job_id: &str) -> String {
    format!("report_{}.json", job_id)
}

pub fn log_path(job_dir: &Path, job_id: &str) -> PathBuf {
    job_dir.join(log_file_name(job_id))
}

pub fn report_path(job_dir: &Path, job_id: &str) -> PathBuf {
    job_dir.join(report_file_name(job_id))
}
