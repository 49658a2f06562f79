// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job command specs that do not need a container runtime.

use crate::prelude::*;

#[test]
fn list_is_empty_in_a_fresh_state_dir() {
    let sandbox = Sandbox::new();
    sandbox.sj().args(&["list"]).passes().stdout_has("No jobs");
}

#[test]
fn list_json_is_an_empty_array() {
    let sandbox = Sandbox::new();
    let output = sandbox.sj().args(&["-o", "json", "list"]).passes();
    assert_eq!(output.stdout_json(), serde_json::json!([]));
}

#[test]
fn unknown_job_exits_not_found() {
    let sandbox = Sandbox::new();
    sandbox.sj().args(&["status", "ghost"]).exits_with(4).stderr_has("job not found: ghost");
    sandbox.sj().args(&["logs", "ghost"]).exits_with(4);
    sandbox.sj().args(&["report", "ghost"]).exits_with(4);
    sandbox.sj().args(&["stop", "ghost"]).exits_with(4);
    sandbox.sj().args(&["delete", "ghost"]).exits_with(4);
}

#[test]
fn launch_without_input_exits_validation() {
    let sandbox = Sandbox::new();
    let request = sandbox.file("req.json", r#"{"id": "job-1", "language": "en"}"#);
    sandbox
        .sj()
        .args(&["launch", &request.display().to_string()])
        .exits_with(2)
        .stderr_has("Must provide --link or --file");
}

#[test]
fn launch_with_unknown_source_exits_validation() {
    let sandbox = Sandbox::new();
    sandbox
        .sj()
        .args(&["launch", "-"])
        .stdin(r#"{"id": "job-2", "source": "dropbox"}"#)
        .exits_with(2)
        .stderr_has("--source must be either 'zoom' or 'onedrive'");
}

#[test]
fn launch_with_malformed_json_exits_validation() {
    let sandbox = Sandbox::new();
    sandbox
        .sj()
        .args(&["launch", "-"])
        .stdin("{not json")
        .exits_with(2)
        .stderr_has("invalid job request JSON");
}

#[test]
fn launch_with_path_like_id_exits_validation() {
    let sandbox = Sandbox::new();
    sandbox
        .sj()
        .args(&["launch", "-"])
        .stdin(r#"{"id": "../escape", "link": "http://x", "language": "en"}"#)
        .exits_with(2)
        .stderr_has("--id must be a single directory name");
    assert!(!sandbox.output_base().join("../escape").exists());
}

#[test]
fn launch_with_option_like_owner_exits_validation() {
    let sandbox = Sandbox::new();
    sandbox
        .sj()
        .args(&["launch", "-"])
        .stdin(r#"{"id": "job-4", "link": "http://x", "language": "en", "owner": "--reference=/etc/shadow"}"#)
        .exits_with(2)
        .stderr_has("owner and group must not start with '-'");
}

#[test]
fn rejected_launch_leaves_no_output_dir() {
    let sandbox = Sandbox::new();
    sandbox
        .sj()
        .args(&["launch", "-"])
        .stdin(r#"{"id": "job-3", "link": "http://x"}"#)
        .exits_with(2);
    assert!(!sandbox.output_base().join("job-3").exists());
}

#[test]
fn delete_all_requires_confirm() {
    let sandbox = Sandbox::new();
    sandbox.sj().args(&["delete-all"]).exits_with(2).stderr_has("confirmation");
    sandbox.sj().args(&["delete-all", "--confirm"]).passes().stdout_has("Deleted 0 job(s)");
}

#[test]
fn recover_with_nothing_pending_passes() {
    let sandbox = Sandbox::new();
    sandbox.sj().args(&["recover"]).passes().stdout_has("Recovering 0");
}

#[test]
fn bad_config_file_fails() {
    let sandbox = Sandbox::new();
    let config = sandbox.file("sj.toml", "imgae = \"typo\"\n");
    sandbox
        .sj()
        .env("SJ_CONFIG", &config.display().to_string())
        .args(&["list"])
        .exits_with(1)
        .stderr_has("invalid config");
}
