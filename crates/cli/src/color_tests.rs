// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn no_color_disables_escapes() {
    std::env::set_var("NO_COLOR", "1");
    std::env::set_var("COLOR", "1");
    assert!(!should_colorize());
    assert_eq!(header("jobs"), "jobs");
    assert_eq!(status(InferredStatus::Stalled), "stalled");
    std::env::remove_var("NO_COLOR");
    std::env::remove_var("COLOR");
}

#[test]
#[serial]
fn empty_no_color_is_ignored() {
    std::env::set_var("NO_COLOR", "");
    std::env::set_var("COLOR", "1");
    assert!(should_colorize());
    std::env::remove_var("NO_COLOR");
    std::env::remove_var("COLOR");
}

#[test]
#[serial]
fn color_forces_escapes() {
    std::env::remove_var("NO_COLOR");
    std::env::set_var("COLOR", "1");
    assert_eq!(muted("x"), "\x1b[38;5;240mx\x1b[0m");
    assert_eq!(status(InferredStatus::Completed), "\x1b[38;5;108mcompleted\x1b[0m");
    std::env::remove_var("COLOR");
}

#[yare::parameterized(
    completed   = { InferredStatus::Completed,  Tone::Good },
    starting    = { InferredStatus::Starting,   Tone::Busy },
    running     = { InferredStatus::Running,    Tone::Busy },
    stalled     = { InferredStatus::Stalled,    Tone::Bad },
    error       = { InferredStatus::Error,      Tone::Bad },
    not_started = { InferredStatus::NotStarted, Tone::Muted },
)]
fn status_tones(status: InferredStatus, expected: Tone) {
    assert_eq!(Tone::for_status(status), expected);
}
