// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sj launch` - start a job from a JSON request

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use sj_core::JobRequest;
use sj_engine::LaunchReceipt;

use crate::color;
use crate::exit_error::{ExitError, EXIT_VALIDATION};
use crate::output::{format_or_json, OutputFormat};
use crate::CliLauncher;

#[derive(Args)]
pub struct LaunchArgs {
    /// Request file in JSON, or "-" for stdin
    pub request: PathBuf,

    /// Return right after the container starts instead of waiting to
    /// finalise permissions (run `sj recover` later)
    #[arg(long)]
    pub detach: bool,
}

pub async fn handle(launcher: CliLauncher, args: LaunchArgs, format: OutputFormat) -> Result<()> {
    let request = read_request(&args.request)?;
    let receipt = launcher.launch(request).await.map_err(ExitError::from)?;

    format_or_json(format, &receipt, print_receipt)?;

    let waits = receipt.note.is_some() && !args.detach;
    if waits {
        eprintln!("{}", color::muted("waiting for the container to exit to finalise permissions..."));
        launcher.shutdown().await;
    }
    Ok(())
}

fn read_request(source: &Path) -> Result<JobRequest> {
    let text = if source == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(source)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", source.display(), e))?
    };
    parse_request(&text)
}

pub(crate) fn parse_request(text: &str) -> Result<JobRequest> {
    serde_json::from_str(text)
        .map_err(|e| ExitError::new(EXIT_VALIDATION, format!("invalid job request JSON: {}", e)).into())
}

fn print_receipt(receipt: &LaunchReceipt) {
    println!("Job {} launched", color::header(receipt.job_id.as_str()));
    println!("  container:   {}", receipt.container_id.short());
    println!("  output:      {}", receipt.host_output_path.display());
    println!("  job dir:     {}", receipt.job_dir.display());
    println!("  owner:       {}", receipt.owner);
    println!("  group:       {}", receipt.group);
    println!("  permissions: {}", receipt.permissions);
    if let Some(ref note) = receipt.note {
        println!("  {}", color::muted(note));
    }
}

#[cfg(test)]
#[path = "launch_tests.rs"]
mod tests;
