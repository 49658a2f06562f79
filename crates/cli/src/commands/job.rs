// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only job commands: status, logs, report, list

use anyhow::Result;
use clap::Args;
use sj_engine::{JobStatus, LogRequest, DEFAULT_LOG_LINES};

use crate::color;
use crate::exit_error::ExitError;
use crate::output::{format_or_json, format_size, render_table, OutputFormat};
use crate::CliLauncher;

#[derive(Args)]
pub struct LogsArgs {
    /// Job ID
    pub id: String,

    /// Number of trailing lines to show
    #[arg(short = 'n', long, default_value_t = DEFAULT_LOG_LINES)]
    pub lines: usize,

    /// Show the whole log
    #[arg(long, conflicts_with = "lines")]
    pub full: bool,
}

impl LogsArgs {
    fn request(&self) -> LogRequest {
        if self.full {
            LogRequest::Full
        } else {
            LogRequest::Tail(self.lines)
        }
    }
}

pub async fn status(launcher: &CliLauncher, id: &str, format: OutputFormat) -> Result<()> {
    let status = launcher.status(id).await.map_err(ExitError::from)?;
    format_or_json(format, &status, print_status)
}

fn print_status(status: &JobStatus) {
    println!("{}: {}", color::header(status.job_id.as_str()), color::status(status.status));
    println!("  job dir:   {}", status.job_dir.display());
    if let Some(ref container) = status.container {
        println!("  container: {}", container);
    }
    if let Some(ref error) = status.error {
        println!("  error:     {}", error);
    }
    if !status.outputs.is_empty() {
        println!("  outputs:");
        for file in &status.outputs {
            println!("    {} {}", file.name, color::muted(&format!("({})", format_size(file.size))));
        }
    }
}

pub async fn logs(launcher: &CliLauncher, args: LogsArgs, format: OutputFormat) -> Result<()> {
    let tail = launcher.logs(&args.id, args.request()).await.map_err(ExitError::from)?;
    format_or_json(format, &tail, |tail| {
        if !tail.text.is_empty() {
            println!("{}", tail.text);
        }
        if tail.lines_returned < tail.total_lines {
            eprintln!(
                "{}",
                color::muted(&format!(
                    "showing last {} of {} lines ({})",
                    tail.lines_returned,
                    tail.total_lines,
                    format_size(tail.file_size)
                ))
            );
        }
    })
}

pub async fn report(launcher: &CliLauncher, id: &str) -> Result<()> {
    let report = launcher.report(id).await.map_err(ExitError::from)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub fn list(launcher: &CliLauncher, format: OutputFormat) -> Result<()> {
    let records = launcher.list().map_err(ExitError::from)?;
    format_or_json(format, &records, |records| {
        if records.is_empty() {
            println!("No jobs");
            return;
        }
        let rows: Vec<Vec<String>> = records
            .iter()
            .map(|r| {
                vec![
                    r.job_id.to_string(),
                    r.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    r.container_id.short().to_string(),
                    r.job_dir.display().to_string(),
                ]
            })
            .collect();
        println!("{}", render_table(&["ID", "CREATED", "CONTAINER", "JOB DIR"], &rows));
    })
}
