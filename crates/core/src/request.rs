// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative job requests and their validation.
//!
//! A request selects one of two workflows:
//!
//! ```text
//! hosted source:  source = zoom | onedrive  [+ passcode, link, withTranscription]
//! direct input:   exactly one of link | file, plus language
//! ```
//!
//! Feature flags are independent of the workflow. Ownership fields
//! (`owner`, `group`, `permissions`) drive permission reconciliation and are
//! never passed to the container.

use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::id::JobId;
use crate::ownership::{FileMode, Ownership};

/// Errors for malformed job requests.
///
/// Messages match the workload's own argument errors so callers see the same
/// text whether the request is rejected here or by the container.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("--id is required and cannot be empty")]
    MissingId,
    #[error("--id must be a single directory name without '/' (got '{0}')")]
    InvalidId(String),
    #[error("--language is required when using --with-transcription")]
    MissingTranscriptionLanguage,
    #[error("Must provide --link or --file if --source is not specified")]
    MissingInput,
    #[error("--link and --file cannot be used together")]
    ConflictingInput,
    #[error("--language is required when using --link or --file")]
    MissingLanguage,
    #[error("--source must be either 'zoom' or 'onedrive' (got '{0}')")]
    InvalidSource(String),
    #[error("--model must be one of: base, small, large-v2 (got '{0}')")]
    InvalidModel(String),
    #[error("permissions must be an octal mode such as 755 (got '{0}')")]
    InvalidPermissions(String),
    #[error("output path must be absolute (got '{0}')")]
    RelativeOutput(String),
    #[error("output path must not contain '.' or '..' and must not be / or sit directly under / or inside /app (got '{0}')")]
    UnsafeOutput(String),
    #[error("owner and group must not start with '-' or contain ':' (got '{0}')")]
    InvalidOwner(String),
    #[error("--file does not name a file (got '{0}')")]
    InvalidFile(String),
}

/// Hosted recording source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Zoom,
    OneDrive,
}

impl Source {
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        Self::from_name(s).ok_or_else(|| ValidationError::InvalidSource(s.to_string()))
    }
}

crate::wire_names! {
    Source {
        Zoom => "zoom",
        OneDrive => "onedrive",
    }
}

/// Transcription model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Model {
    #[serde(rename = "base")]
    Base,
    #[serde(rename = "small")]
    Small,
    #[serde(rename = "large-v2")]
    LargeV2,
}

impl Model {
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        Self::from_name(s).ok_or_else(|| ValidationError::InvalidModel(s.to_string()))
    }
}

crate::wire_names! {
    Model {
        Base => "base",
        Small => "small",
        LargeV2 => "large-v2",
    }
}

/// Speaker diarization setting.
///
/// `true` or `-1` asks the workload to detect the speaker count itself;
/// any other number is passed through as the expected count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Speakers {
    Flag(bool),
    Count(i64),
}

impl Speakers {
    /// Value to pass after `--speakers`, or `None` for the bare flag.
    ///
    /// `Flag(false)` is handled by the planner, which omits the flag entirely.
    pub fn argument(&self) -> Option<String> {
        match self {
            Self::Flag(_) | Self::Count(-1) => None,
            Self::Count(n) => Some(n.to_string()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Flag(false))
    }
}

/// A job request as submitted by a caller.
///
/// Keys are camelCase on the wire (`withTranscription`, `shortSummary`, ...).
/// `source`, `model` and `permissions` stay raw strings here so that an
/// unknown value is reported as a [`ValidationError`] instead of a decode error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobRequest {
    pub id: Option<String>,
    pub source: Option<String>,
    pub passcode: Option<String>,
    pub link: Option<String>,
    pub file: Option<String>,
    pub with_transcription: bool,
    pub output: Option<PathBuf>,
    pub language: Option<String>,
    pub model: Option<String>,
    pub speakers: Option<Speakers>,
    pub transcribe: bool,
    pub restore: bool,
    pub timestamps: bool,
    pub short_summary: bool,
    pub detail_summary: bool,
    pub translate: Option<String>,
    pub download_audio: bool,
    pub owner: Option<String>,
    pub group: Option<String>,
    #[serde(deserialize_with = "deserialize_mode_text")]
    pub permissions: Option<String>,
}

impl JobRequest {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: Some(id.into()), ..Self::default() }
    }

    crate::setters! {
        source: Option<String>,
        passcode: Option<String>,
        link: Option<String>,
        file: Option<String>,
        set with_transcription: bool,
        output: Option<PathBuf>,
        language: Option<String>,
        model: Option<String>,
        speakers: Option<Speakers>,
        set transcribe: bool,
        set restore: bool,
        set timestamps: bool,
        set short_summary: bool,
        set detail_summary: bool,
        translate: Option<String>,
        set download_audio: bool,
        owner: Option<String>,
        group: Option<String>,
        permissions: Option<String>,
    }

    /// Fill in a generated id when the caller did not supply one.
    ///
    /// An explicitly empty id is left alone so validation can reject it.
    pub fn ensure_id(mut self) -> Self {
        if self.id.is_none() {
            self.id = Some(JobId::generate().to_string());
        }
        self
    }

    /// Validate the request, first failure wins.
    ///
    /// Order: identifier, workflow requirements, source value, model value,
    /// permissions, owner and group, output path.
    pub fn validate(&self) -> Result<Validated, ValidationError> {
        let id = match self.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id,
            _ => return Err(ValidationError::MissingId),
        };
        // The id names directories below the output path.
        if !is_single_component(id) {
            return Err(ValidationError::InvalidId(id.to_string()));
        }
        let id = JobId::new(id);

        if self.source.is_some() {
            if self.with_transcription && !has_text(&self.language) {
                return Err(ValidationError::MissingTranscriptionLanguage);
            }
        } else {
            match (has_text(&self.link), has_text(&self.file)) {
                (false, false) => return Err(ValidationError::MissingInput),
                (true, true) => return Err(ValidationError::ConflictingInput),
                _ => {}
            }
            if !has_text(&self.language) {
                return Err(ValidationError::MissingLanguage);
            }
        }

        let source = self.source.as_deref().map(Source::parse).transpose()?;
        let model = self.model.as_deref().map(Model::parse).transpose()?;

        let mode = match self.permissions.as_deref() {
            Some(raw) => Some(
                FileMode::parse_octal(raw)
                    .ok_or_else(|| ValidationError::InvalidPermissions(raw.to_string()))?,
            ),
            None => None,
        };

        let owner = self.owner.clone().filter(|s| !s.is_empty());
        let group = self.group.clone().filter(|s| !s.is_empty());
        for name in owner.iter().chain(group.iter()) {
            if name.starts_with('-') || name.contains(':') {
                return Err(ValidationError::InvalidOwner(name.clone()));
            }
        }

        if let Some(ref output) = self.output {
            if !output.is_absolute() {
                return Err(ValidationError::RelativeOutput(output.display().to_string()));
            }
        }

        let ownership = Ownership { owner, group, mode };

        Ok(Validated { id, source, model, ownership })
    }
}

/// Typed values extracted by [`JobRequest::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated {
    pub id: JobId,
    pub source: Option<Source>,
    pub model: Option<Model>,
    pub ownership: Ownership,
}

fn is_single_component(id: &str) -> bool {
    id != "." && id != ".." && !id.contains(['/', '\\', '\0'])
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.is_empty())
}

/// Accept permissions as either a string (`"755"`) or a bare number (`755`).
///
/// Both forms are read as octal digits later; the number is not a decimal mode.
fn deserialize_mode_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Helper {
        Text(String),
        Number(u64),
    }

    Ok(Option::<Helper>::deserialize(deserializer)?.map(|h| match h {
        Helper::Text(s) => s,
        Helper::Number(n) => n.to_string(),
    }))
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
