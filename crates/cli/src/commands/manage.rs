// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mutating job commands: stop, delete, delete-all, recover

use anyhow::Result;
use serde_json::json;

use crate::color;
use crate::exit_error::ExitError;
use crate::output::{format_or_json, OutputFormat};
use crate::CliLauncher;

pub async fn stop(launcher: &CliLauncher, id: &str, format: OutputFormat) -> Result<()> {
    launcher.terminate(id).await.map_err(ExitError::from)?;
    format_or_json(format, &json!({ "job_id": id, "stopped": true }), |_| {
        println!("Job {} stopped", color::header(id));
    })
}

pub async fn delete(launcher: &CliLauncher, id: &str, format: OutputFormat) -> Result<()> {
    let outcome = launcher.delete(id).await.map_err(ExitError::from)?;
    format_or_json(format, &outcome, |o| {
        let suffix = if o.removed_dir { "" } else { " (no directory removed)" };
        println!("Deleted job {}{}", color::header(o.job_id.as_str()), suffix);
    })
}

pub async fn delete_all(launcher: &CliLauncher, confirm: bool, format: OutputFormat) -> Result<()> {
    let outcome = launcher.delete_all(confirm).await.map_err(ExitError::from)?;
    format_or_json(format, &outcome, |o| {
        println!("Deleted {} job(s) and {} output directory(ies)", o.jobs_removed, o.dirs_removed);
    })
}

pub async fn recover(launcher: CliLauncher, format: OutputFormat) -> Result<()> {
    let summary = launcher.recover().await.map_err(ExitError::from)?;
    format_or_json(format, &summary, |s| {
        println!(
            "Recovering {} pending permission pass(es): {} waiting on running containers, {} for exited containers",
            s.reattached.len() + s.replayed.len(),
            s.reattached.len(),
            s.replayed.len()
        );
        if !s.deferred.is_empty() {
            println!("{} left pending (monitor queue full)", s.deferred.len());
        }
    })?;
    launcher.shutdown().await;
    Ok(())
}
