// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    plain        = { "644",   Some(0o644) },
    leading_zero = { "0755",  Some(0o755) },
    rust_prefix  = { "0o700", Some(0o700) },
    sticky       = { "1777",  Some(0o1777) },
    padded       = { " 600 ", Some(0o600) },
    not_octal    = { "888",   None },
    too_large    = { "17777", None },
    empty        = { "",      None },
    letters      = { "rwx",   None },
)]
fn parse_octal(input: &str, expected: Option<u32>) {
    assert_eq!(FileMode::parse_octal(input).map(|m| m.bits()), expected);
}

#[test]
fn directory_mode_gains_execute_bits() {
    let mode = FileMode::parse_octal("644").unwrap();
    assert_eq!(mode.file_mode(), 0o644);
    assert_eq!(mode.dir_mode(), 0o755);

    let private = FileMode::parse_octal("600").unwrap();
    assert_eq!(private.dir_mode(), 0o711);
}

#[test]
fn mode_displays_as_octal() {
    assert_eq!(FileMode::parse_octal("0750").unwrap().to_string(), "750");
}

#[yare::parameterized(
    both       = { Some("alice"), Some("staff"), Some("alice:staff") },
    owner_only = { Some("alice"), None,          Some("alice") },
    group_only = { None,          Some("staff"), Some(":staff") },
    neither    = { None,          None,          None },
)]
fn chown_spec(owner: Option<&str>, group: Option<&str>, expected: Option<&str>) {
    let ownership = Ownership {
        owner: owner.map(String::from),
        group: group.map(String::from),
        mode: None,
    };
    assert_eq!(ownership.chown_spec().as_deref(), expected);
}

#[test]
fn describe_lists_each_requested_change() {
    let ownership = Ownership {
        owner: Some("alice".to_string()),
        group: None,
        mode: FileMode::new(0o640),
    };
    assert_eq!(ownership.describe(), vec!["owner to alice", "permissions to 640"]);
    assert!(!ownership.is_empty());
    assert!(Ownership::default().is_empty());
    assert!(Ownership::default().describe().is_empty());
}
