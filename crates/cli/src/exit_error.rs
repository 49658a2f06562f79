// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Custom error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to handle process termination.

use std::fmt;

use sj_engine::EngineError;

/// Malformed request or missing confirmation.
pub const EXIT_VALIDATION: i32 = 2;
/// Job id already in use.
pub const EXIT_CONFLICT: i32 = 3;
/// Unknown job or missing artifact.
pub const EXIT_NOT_FOUND: i32 = 4;
pub const EXIT_FAILURE: i32 = 1;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl From<EngineError> for ExitError {
    fn from(e: EngineError) -> Self {
        let code = match e {
            EngineError::Validation(_) | EngineError::ConfirmationRequired => EXIT_VALIDATION,
            EngineError::Conflict(_) => EXIT_CONFLICT,
            EngineError::NotFound(_) | EngineError::Report { .. } => EXIT_NOT_FOUND,
            _ => EXIT_FAILURE,
        };
        Self::new(code, e.to_string())
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
