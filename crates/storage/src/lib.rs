// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sj-storage: the job index and durable pending reconciliations.
//!
//! Both live in one JSON state file that is rewritten atomically on every
//! change. The file is re-read before each operation so separate `sj`
//! processes see each other's writes.

mod record;
mod store;

pub use record::{JobRecord, PendingReconcile};
pub use store::{JobStore, StoreError, CURRENT_STATE_VERSION, LOCK_FILE_NAME, STATE_FILE_NAME};
