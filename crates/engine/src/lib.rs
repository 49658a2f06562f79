// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sj-engine: launches scribe jobs and reconciles their output permissions.
//!
//! ```text
//! launch ─► plan ─► start container ─► best-effort pass ─► monitor pool
//!                                                           │
//!                                   wait for exit ◄─────────┘
//!                                   settle delay
//!                                   authoritative pass
//! ```

pub mod config;
pub mod env;
mod error;
pub mod launcher;
pub mod monitor;
pub mod reconciler;
pub mod status;

pub use config::{ConfigError, EngineConfig, FileConfig};
pub use error::EngineError;
pub use launcher::{
    DeleteAllOutcome, DeleteOutcome, LaunchReceipt, Launcher, LogRequest, LogTail,
    RecoverySummary, DEFAULT_LOG_LINES,
};
pub use monitor::{MonitorError, MonitorPool, MonitorSettings, MonitorTask};
pub use reconciler::{ReconcileError, Reconciler};
pub use status::{JobStatus, OutputFile, StatusInferencer};
