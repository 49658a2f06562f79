// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal colors for `sj` output and clap help.

use std::io::IsTerminal;

use clap::builder::styling::{Ansi256Color, Color, Style, Styles};
use sj_core::InferredStatus;

/// 256-color palette slots used by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Header,
    Literal,
    Placeholder,
    Muted,
    Good,
    Busy,
    Bad,
}

impl Tone {
    pub fn code(self) -> u8 {
        match self {
            Self::Header => 74,
            Self::Literal => 250,
            Self::Placeholder => 245,
            Self::Muted => 240,
            Self::Good => 108,
            Self::Busy => 179,
            Self::Bad => 167,
        }
    }

    fn style(self) -> Style {
        Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(self.code()))))
    }

    pub fn for_status(status: InferredStatus) -> Self {
        match status {
            InferredStatus::Completed => Self::Good,
            InferredStatus::Starting | InferredStatus::Running => Self::Busy,
            InferredStatus::Stalled | InferredStatus::Error => Self::Bad,
            InferredStatus::NotStarted => Self::Muted,
        }
    }
}

/// Whether to emit ANSI escapes on stdout.
///
/// A non-empty `NO_COLOR` wins, then `COLOR=1`, then whether stdout is a tty.
pub fn should_colorize() -> bool {
    if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        return false;
    }
    if std::env::var("COLOR").is_ok_and(|v| v == "1") {
        return true;
    }
    std::io::stdout().is_terminal()
}

pub fn styles() -> Styles {
    if !should_colorize() {
        return Styles::plain();
    }
    Styles::styled()
        .header(Tone::Header.style())
        .literal(Tone::Literal.style())
        .placeholder(Tone::Placeholder.style())
}

pub fn paint(tone: Tone, text: &str) -> String {
    if should_colorize() {
        format!("\x1b[38;5;{}m{}\x1b[0m", tone.code(), text)
    } else {
        text.to_string()
    }
}

pub fn header(text: &str) -> String {
    paint(Tone::Header, text)
}

pub fn muted(text: &str) -> String {
    paint(Tone::Muted, text)
}

/// Status word colored by outcome.
pub fn status(status: InferredStatus) -> String {
    paint(Tone::for_status(status), status.as_str())
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
