// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration.
//!
//! Values resolve in three layers, later layers winning:
//!
//! ```text
//! built-in defaults  <  TOML file named by SJ_CONFIG  <  SJ_* environment
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use sj_core::{PlannerConfig, DEFAULT_STALE_AFTER};
use thiserror::Error;

use crate::env;
use crate::monitor::MonitorSettings;

/// Image run for every job unless overridden.
pub const DEFAULT_IMAGE: &str = "abdlrhman00/turboscribe-bot-2:v4.0";

/// Pause between container exit and the authoritative pass.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(3);

pub const DEFAULT_MAX_MONITORS: usize = 32;
pub const DEFAULT_MONITOR_QUEUE: usize = 256;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no state directory: set SJ_STATE_DIR or HOME")]
    NoStateDir,
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Contents of the optional TOML config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub image: Option<String>,
    pub output_base: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    pub state_dir: Option<PathBuf>,
    pub settle_delay_ms: Option<u64>,
    pub stale_after_secs: Option<u64>,
    pub max_monitors: Option<usize>,
    pub monitor_queue: Option<usize>,
    pub docker_timeout_ms: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }
}

/// Resolved engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub image: String,
    pub output_base: PathBuf,
    pub env_file: Option<PathBuf>,
    pub state_dir: PathBuf,
    pub settle_delay: Duration,
    pub stale_after: Duration,
    pub max_monitors: usize,
    pub monitor_queue: usize,
    pub docker_timeout: Duration,
}

impl EngineConfig {
    /// Defaults rooted at `state_dir`; outputs go to `<state_dir>/outputs`.
    pub fn with_state_dir(state_dir: impl Into<PathBuf>) -> Self {
        let state_dir = state_dir.into();
        Self {
            image: DEFAULT_IMAGE.to_string(),
            output_base: state_dir.join("outputs"),
            env_file: None,
            state_dir,
            settle_delay: DEFAULT_SETTLE_DELAY,
            stale_after: DEFAULT_STALE_AFTER,
            max_monitors: DEFAULT_MAX_MONITORS,
            monitor_queue: DEFAULT_MONITOR_QUEUE,
            docker_timeout: sj_adapters::subprocess::DOCKER_TIMEOUT,
        }
    }

    /// Resolve from defaults, the `SJ_CONFIG` file and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut file = match env::config_path() {
            Some(path) => FileConfig::load(&path)?,
            None => FileConfig::default(),
        };
        // SJ_STATE_DIR > file > XDG_STATE_HOME/sj > ~/.local/state/sj
        let state_dir = env::state_dir_override()
            .or(file.state_dir.take())
            .or_else(env::default_state_dir)
            .ok_or(ConfigError::NoStateDir)?;
        let mut config = Self::with_state_dir(state_dir).overlay(file);
        config.apply_env();
        config.check()?;
        Ok(config)
    }

    /// Apply values from a config file.
    pub fn overlay(mut self, file: FileConfig) -> Self {
        if let Some(dir) = file.state_dir {
            // Outputs follow the state dir unless set explicitly.
            if self.output_base == self.state_dir.join("outputs") {
                self.output_base = dir.join("outputs");
            }
            self.state_dir = dir;
        }
        if let Some(image) = file.image {
            self.image = image;
        }
        if let Some(base) = file.output_base {
            self.output_base = base;
        }
        if file.env_file.is_some() {
            self.env_file = file.env_file;
        }
        if let Some(ms) = file.settle_delay_ms {
            self.settle_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = file.stale_after_secs {
            self.stale_after = Duration::from_secs(secs);
        }
        if let Some(n) = file.max_monitors {
            self.max_monitors = n;
        }
        if let Some(n) = file.monitor_queue {
            self.monitor_queue = n;
        }
        if let Some(ms) = file.docker_timeout_ms {
            self.docker_timeout = Duration::from_millis(ms);
        }
        self
    }

    /// Apply `SJ_*` environment overrides (state dir is resolved in [`Self::load`]).
    pub fn apply_env(&mut self) {
        if let Some(image) = env::image() {
            self.image = image;
        }
        if let Some(base) = env::output_base() {
            self.output_base = base;
        }
        if let Some(file) = env::env_file() {
            self.env_file = Some(file);
        }
        if let Some(delay) = env::settle_delay() {
            self.settle_delay = delay;
        }
        if let Some(stale) = env::stale_after() {
            self.stale_after = stale;
        }
        if let Some(n) = env::max_monitors() {
            self.max_monitors = n;
        }
        if let Some(n) = env::monitor_queue() {
            self.monitor_queue = n;
        }
        if let Some(timeout) = env::docker_timeout() {
            self.docker_timeout = timeout;
        }
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.max_monitors == 0 {
            return Err(ConfigError::Zero("max_monitors"));
        }
        if self.monitor_queue == 0 {
            return Err(ConfigError::Zero("monitor_queue"));
        }
        Ok(())
    }

    pub fn planner(&self) -> PlannerConfig {
        let mut planner = PlannerConfig::new(&self.output_base);
        planner.env_file = self.env_file.clone();
        planner
    }

    pub fn monitor_settings(&self) -> MonitorSettings {
        MonitorSettings {
            max_concurrent: self.max_monitors,
            queue_capacity: self.monitor_queue,
            settle_delay: self.settle_delay,
        }
    }

    sj_core::setters! {
        image: String,
        output_base: PathBuf,
        env_file: Option<PathBuf>,
        set settle_delay: Duration,
        set stale_after: Duration,
        set max_monitors: usize,
        set monitor_queue: usize,
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
