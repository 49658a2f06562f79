// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job status inference from filesystem facts.
//!
//! Nothing about a job's progress is stored. Each query gathers a handful of
//! facts about the job directory and [`infer`] maps them to a status:
//!
//! ```text
//! job dir absent                      -> not_started
//! report present, parses              -> completed   (wins over log recency)
//! report present, unparsable          -> error
//! log modified within stale_after     -> running
//! log older than stale_after          -> stalled
//! neither                             -> starting
//! ```

use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

/// Log age after which a job without a report counts as stalled.
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(5 * 60);

/// Phase of a job as derived from its directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferredStatus {
    NotStarted,
    Starting,
    Running,
    Stalled,
    Completed,
    Error,
}

crate::wire_names! {
    InferredStatus {
        NotStarted => "not_started",
        Starting => "starting",
        Running => "running",
        Stalled => "stalled",
        Completed => "completed",
        Error => "error",
    }
}

impl InferredStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

/// Filesystem facts about one job directory.
#[derive(Debug, Clone, Default)]
pub struct StatusFacts {
    pub dir_exists: bool,
    /// `Some` when the report file exists: the parsed report or the parse error.
    pub report: Option<Result<serde_json::Value, String>>,
    /// Modification time of the log file, when it exists.
    pub log_modified: Option<SystemTime>,
}

/// Result of [`infer`].
#[derive(Debug, Clone, PartialEq)]
pub struct Inference {
    pub status: InferredStatus,
    pub report: Option<serde_json::Value>,
    pub error: Option<String>,
}

impl Inference {
    fn bare(status: InferredStatus) -> Self {
        Self { status, report: None, error: None }
    }
}

/// Derive a job's status from facts gathered at `now`.
pub fn infer(facts: StatusFacts, now: SystemTime, stale_after: Duration) -> Inference {
    if !facts.dir_exists {
        return Inference::bare(InferredStatus::NotStarted);
    }

    match facts.report {
        Some(Ok(report)) => {
            return Inference { status: InferredStatus::Completed, report: Some(report), error: None }
        }
        Some(Err(e)) => {
            return Inference {
                status: InferredStatus::Error,
                report: None,
                error: Some(format!("failed to read report: {}", e)),
            }
        }
        None => {}
    }

    match facts.log_modified {
        // A modification time ahead of `now` (clock skew) counts as fresh.
        Some(modified) => {
            let fresh = now.duration_since(modified).map(|age| age < stale_after).unwrap_or(true);
            Inference::bare(if fresh { InferredStatus::Running } else { InferredStatus::Stalled })
        }
        None => Inference::bare(InferredStatus::Starting),
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
