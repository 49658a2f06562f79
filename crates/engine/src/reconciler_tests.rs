// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sj_adapters::{FakePermissionAdapter, HostPermissions, PermissionCall};
use sj_core::FileMode;
use std::os::unix::fs::PermissionsExt;
use tempfile::tempdir;

fn ownership(owner: Option<&str>, group: Option<&str>, mode: Option<u32>) -> Ownership {
    Ownership {
        owner: owner.map(String::from),
        group: group.map(String::from),
        mode: mode.and_then(FileMode::new),
    }
}

#[tokio::test]
async fn applies_owner_group_and_mode() {
    let dir = tempdir().unwrap();
    let fake = FakePermissionAdapter::new();
    let reconciler = Reconciler::new(fake.clone());

    let changes = reconciler
        .apply(dir.path(), &ownership(Some("alice"), Some("staff"), Some(0o750)))
        .await
        .unwrap();

    assert_eq!(changes, vec!["owner to alice", "group to staff", "permissions to 750"]);
    assert_eq!(
        fake.calls(),
        vec![
            PermissionCall::Chown { path: dir.path().to_path_buf(), spec: "alice:staff".into() },
            PermissionCall::Chmod { path: dir.path().to_path_buf(), mode: FileMode::new(0o750).unwrap() },
        ]
    );
}

#[yare::parameterized(
    owner_only = { Some("alice"), None,          "alice" },
    group_only = { None,          Some("staff"), ":staff" },
)]
fn chown_spec_forms(owner: Option<&str>, group: Option<&str>, expected: &str) {
    let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
    rt.block_on(async {
        let dir = tempdir().unwrap();
        let fake = FakePermissionAdapter::new();
        Reconciler::new(fake.clone()).apply(dir.path(), &ownership(owner, group, None)).await.unwrap();
        assert_eq!(fake.owner_of(dir.path()).as_deref(), Some(expected));
    });
}

#[tokio::test]
async fn nothing_requested_is_a_no_op() {
    let dir = tempdir().unwrap();
    let fake = FakePermissionAdapter::new();
    let changes = Reconciler::new(fake.clone()).apply(dir.path(), &Ownership::default()).await.unwrap();
    assert!(changes.is_empty());
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn missing_path_fails_even_with_nothing_requested() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("gone");
    let err = Reconciler::new(FakePermissionAdapter::new())
        .apply(&missing, &Ownership::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ReconcileError::NotFound(p) if p == missing));
}

#[tokio::test]
async fn adapter_failure_is_reported() {
    let dir = tempdir().unwrap();
    let fake = FakePermissionAdapter::new();
    fake.fail_next(1);
    let err = Reconciler::new(fake)
        .apply(dir.path(), &ownership(Some("nobody-here"), None, None))
        .await
        .unwrap_err();
    assert!(matches!(err, ReconcileError::Permission(PermissionError::Chown { .. })));
}

#[tokio::test]
async fn host_mode_change_gives_dirs_exec_bits() {
    let dir = tempdir().unwrap();
    let job = dir.path().join("job");
    std::fs::create_dir_all(job.join("sub")).unwrap();
    std::fs::write(job.join("sub/out.txt"), "x").unwrap();

    Reconciler::new(HostPermissions::new())
        .apply(&job, &ownership(None, None, Some(0o644)))
        .await
        .unwrap();

    let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o7777;
    assert_eq!(mode(&job.join("sub")), 0o755);
    assert_eq!(mode(&job.join("sub/out.txt")), 0o644);
}
