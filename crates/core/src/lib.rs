// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sj-core: job requests, launch planning and status inference for scribe jobs.
//!
//! Everything in this crate is pure. Filesystem checks, container control and
//! ownership changes live in `sj-adapters` and `sj-engine`.

pub mod macros;

pub mod artifacts;
pub mod clock;
pub mod id;
pub mod mount;
pub mod ownership;
pub mod plan;
pub mod request;
pub mod status;

pub use artifacts::{log_file_name, log_path, report_file_name, report_path};
pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "test-support"))]
pub use clock::FakeClock;
pub use id::{short, ContainerId, JobId};
pub use mount::{Bind, BindMode, MountPlan};
pub use ownership::{FileMode, Ownership, DIR_EXEC_BITS};
pub use plan::{plan, JobPlan, PlannerConfig, CONTAINER_APP_DIR, CONTAINER_ENV_FILE, CONTAINER_INPUT_DIR};
pub use request::{JobRequest, Model, Source, Speakers, Validated, ValidationError};
pub use status::{infer, InferredStatus, Inference, StatusFacts, DEFAULT_STALE_AFTER};
