// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs

use crate::prelude::*;

#[test]
fn sj_help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("launch")
        .stdout_has("status")
        .stdout_has("recover");
}

#[test]
fn sj_no_args_is_a_usage_error() {
    cli().exits_with(2).stderr_has("Usage:");
}

#[test]
fn sj_launch_help_mentions_detach() {
    cli().args(&["launch", "--help"]).passes().stdout_has("--detach");
}

#[test]
fn sj_logs_help_mentions_full() {
    cli().args(&["logs", "--help"]).passes().stdout_has("--full");
}

#[test]
fn sj_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.2");
}
