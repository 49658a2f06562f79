// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `sj` - launch scribe jobs in containers and finalise their output permissions

mod color;
mod commands;
mod exit_error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sj_adapters::{DockerRuntime, HostPermissions};
use sj_core::SystemClock;
use sj_engine::{EngineConfig, Launcher};
use sj_storage::JobStore;
use tracing_subscriber::EnvFilter;

use crate::commands::{job, launch, manage};
use crate::exit_error::ExitError;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "sj", version, about = "Scribe jobs: container launcher with deferred permission reconciliation")]
#[command(styles = color::styles())]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch a job from a JSON request file ("-" reads stdin)
    Launch(launch::LaunchArgs),
    /// Show the inferred status of a job
    Status {
        /// Job ID
        id: String,
    },
    /// Show a job's log
    Logs(job::LogsArgs),
    /// Print a completed job's report
    Report {
        /// Job ID
        id: String,
    },
    /// List jobs, newest first
    List,
    /// Stop a job's container (permissions are still finalised)
    Stop {
        /// Job ID
        id: String,
    },
    /// Delete a job and its output directory
    Delete {
        /// Job ID
        id: String,
    },
    /// Delete every job and every directory under the output base
    DeleteAll {
        /// Required: confirm deleting everything
        #[arg(long)]
        confirm: bool,
    },
    /// Replay permission passes left pending by earlier runs and wait for them
    Recover,
}

pub(crate) type CliLauncher = Launcher<DockerRuntime, HostPermissions, SystemClock>;

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SJ_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn build_launcher() -> Result<CliLauncher> {
    let config = EngineConfig::load()?;
    tracing::debug!(
        state_dir = %config.state_dir.display(),
        output_base = %config.output_base.display(),
        image = %config.image,
        "configuration loaded"
    );
    let store = JobStore::open(&config.state_dir)?;
    let runtime = DockerRuntime::new().with_timeout(config.docker_timeout);
    Ok(Launcher::new(&config, runtime, HostPermissions::new(), store, SystemClock))
}

async fn run(cli: Cli) -> Result<()> {
    let launcher = build_launcher()?;
    let format = cli.format;

    let result = match cli.command {
        Commands::Launch(args) => return launch::handle(launcher, args, format).await,
        Commands::Recover => return manage::recover(launcher, format).await,
        Commands::Status { id } => job::status(&launcher, &id, format).await,
        Commands::Logs(args) => job::logs(&launcher, args, format).await,
        Commands::Report { id } => job::report(&launcher, &id).await,
        Commands::List => job::list(&launcher, format),
        Commands::Stop { id } => manage::stop(&launcher, &id, format).await,
        Commands::Delete { id } => manage::delete(&launcher, &id, format).await,
        Commands::DeleteAll { confirm } => manage::delete_all(&launcher, confirm, format).await,
    };
    launcher.shutdown().await;
    result
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(e) = run(cli).await {
        if let Some(exit) = e.downcast_ref::<ExitError>() {
            if !exit.message.is_empty() {
                eprintln!("Error: {}", exit.message);
            }
            std::process::exit(exit.code);
        }
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
