// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the engine crate.
//!
//! Each function returns `None` when the variable is unset or unparsable so
//! that [`crate::EngineConfig`] can fall back to the file or default value.

use std::path::PathBuf;
use std::time::Duration;

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    var(name).and_then(|s| s.trim().parse::<T>().ok())
}

/// Container image (`SJ_IMAGE`)
pub fn image() -> Option<String> {
    var("SJ_IMAGE")
}

/// Base directory for generated output paths (`SJ_OUTPUT_BASE`)
pub fn output_base() -> Option<PathBuf> {
    var("SJ_OUTPUT_BASE").map(PathBuf::from)
}

/// Host env file mounted into the container (`SJ_ENV_FILE`)
pub fn env_file() -> Option<PathBuf> {
    var("SJ_ENV_FILE").map(PathBuf::from)
}

/// Explicit state directory (`SJ_STATE_DIR`)
pub fn state_dir_override() -> Option<PathBuf> {
    var("SJ_STATE_DIR").map(PathBuf::from)
}

/// Fallback state directory: XDG_STATE_HOME/sj > ~/.local/state/sj
pub fn default_state_dir() -> Option<PathBuf> {
    if let Some(xdg) = var("XDG_STATE_HOME") {
        return Some(PathBuf::from(xdg).join("sj"));
    }
    dirs::home_dir().map(|home| home.join(".local/state/sj"))
}

/// Settle delay after container exit (`SJ_SETTLE_DELAY_MS`)
pub fn settle_delay() -> Option<Duration> {
    parse::<u64>("SJ_SETTLE_DELAY_MS").map(Duration::from_millis)
}

/// Log age after which a job counts as stalled (`SJ_STALE_AFTER_SECS`)
pub fn stale_after() -> Option<Duration> {
    parse::<u64>("SJ_STALE_AFTER_SECS").map(Duration::from_secs)
}

/// Concurrent exit monitors (`SJ_MAX_MONITORS`)
pub fn max_monitors() -> Option<usize> {
    parse::<usize>("SJ_MAX_MONITORS").filter(|n| *n > 0)
}

/// Queued monitor capacity (`SJ_MONITOR_QUEUE`)
pub fn monitor_queue() -> Option<usize> {
    parse::<usize>("SJ_MONITOR_QUEUE").filter(|n| *n > 0)
}

/// Timeout for short docker CLI calls (`SJ_DOCKER_TIMEOUT_MS`)
pub fn docker_timeout() -> Option<Duration> {
    parse::<u64>("SJ_DOCKER_TIMEOUT_MS").map(Duration::from_millis)
}

/// Optional TOML config file (`SJ_CONFIG`)
pub fn config_path() -> Option<PathBuf> {
    var("SJ_CONFIG").map(PathBuf::from)
}
