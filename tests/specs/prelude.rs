// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for driving the `sj` binary.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tempfile::TempDir;

/// Path to the `sj` binary, building it on first use if needed.
fn sj_binary() -> &'static Path {
    static BIN: OnceLock<PathBuf> = OnceLock::new();
    BIN.get_or_init(|| {
        let path = assert_cmd::cargo::cargo_bin("sj");
        if !path.exists() {
            let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
            let status = std::process::Command::new(cargo)
                .args(["build", "-p", "sj", "--bin", "sj"])
                .current_dir(env!("CARGO_MANIFEST_DIR"))
                .status()
                .expect("failed to run cargo build");
            assert!(status.success(), "cargo build -p sj failed");
        }
        path
    })
}

/// Isolated state and output directories for one spec.
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("state")).expect("state dir");
        std::fs::create_dir_all(dir.path().join("outputs")).expect("outputs dir");
        Self { dir }
    }

    pub fn state_dir(&self) -> PathBuf {
        self.dir.path().join("state")
    }

    pub fn output_base(&self) -> PathBuf {
        self.dir.path().join("outputs")
    }

    /// Write a file relative to the sandbox root and return its path.
    pub fn file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("write file");
        path
    }

    /// `sj` with the sandbox's state and output directories.
    pub fn sj(&self) -> Cli {
        cli()
            .env("SJ_STATE_DIR", &self.state_dir().display().to_string())
            .env("SJ_OUTPUT_BASE", &self.output_base().display().to_string())
    }
}

/// `sj` with a clean environment.
pub fn cli() -> Cli {
    let mut cmd = assert_cmd::Command::new(sj_binary());
    for var in [
        "SJ_CONFIG",
        "SJ_IMAGE",
        "SJ_ENV_FILE",
        "SJ_STATE_DIR",
        "SJ_OUTPUT_BASE",
        "SJ_SETTLE_DELAY_MS",
        "SJ_MAX_MONITORS",
        "SJ_MONITOR_QUEUE",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1").env("SJ_LOG", "warn");
    Cli { cmd }
}

pub struct Cli {
    cmd: assert_cmd::Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn stdin(mut self, input: &str) -> Self {
        self.cmd.write_stdin(input.to_string());
        self
    }

    /// Run and require exit code 0.
    pub fn passes(mut self) -> Output {
        let out = self.cmd.output().expect("run sj");
        let output = Output::from(out);
        assert_eq!(output.code, Some(0), "expected success\n{}", output);
        output
    }

    /// Run and require the given exit code.
    pub fn exits_with(mut self, code: i32) -> Output {
        let out = self.cmd.output().expect("run sj");
        let output = Output::from(out);
        assert_eq!(output.code, Some(code), "unexpected exit code\n{}", output);
        output
    }
}

pub struct Output {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl From<std::process::Output> for Output {
    fn from(out: std::process::Output) -> Self {
        Self {
            code: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        }
    }
}

impl std::fmt::Display for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "--- stdout ---\n{}\n--- stderr ---\n{}", self.stdout, self.stderr)
    }
}

impl Output {
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout missing {:?}\n{}", needle, self);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr missing {:?}\n{}", needle, self);
        self
    }

    pub fn stdout_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout).unwrap_or_else(|e| panic!("stdout is not JSON: {}\n{}", e, self))
    }
}
