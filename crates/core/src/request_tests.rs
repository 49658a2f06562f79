// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn direct(id: &str) -> JobRequest {
    JobRequest::new(id).link("http://x").language("en")
}

#[test]
fn direct_link_request_is_valid() {
    let validated = direct("job-1").validate().unwrap();
    assert_eq!(validated.id, "job-1");
    assert_eq!(validated.source, None);
    assert!(validated.ownership.is_empty());
}

#[yare::parameterized(
    missing_id          = { JobRequest::default().link("http://x").language("en"),             ValidationError::MissingId },
    blank_id            = { JobRequest::new("   ").link("http://x").language("en"),            ValidationError::MissingId },
    no_input            = { JobRequest::new("j").language("en"),                               ValidationError::MissingInput },
    both_inputs         = { JobRequest::new("j").link("http://x").file("a.mp3").language("en"), ValidationError::ConflictingInput },
    direct_no_language  = { JobRequest::new("j").file("a.mp3"),                                ValidationError::MissingLanguage },
    source_transcribe   = { JobRequest::new("j").source("zoom").with_transcription(true),      ValidationError::MissingTranscriptionLanguage },
    bad_source          = { JobRequest::new("j").source("dropbox"),                            ValidationError::InvalidSource("dropbox".into()) },
    bad_model           = { direct("j").model("huge"),                                         ValidationError::InvalidModel("huge".into()) },
    bad_permissions     = { direct("j").permissions("rwx"),                                    ValidationError::InvalidPermissions("rwx".into()) },
    relative_output     = { direct("j").output("out/dir"),                                     ValidationError::RelativeOutput("out/dir".into()) },
    id_parent_dir       = { direct("../victim"),                                               ValidationError::InvalidId("../victim".into()) },
    id_dot_dot          = { direct(".."),                                                      ValidationError::InvalidId("..".into()) },
    id_dot              = { direct("."),                                                       ValidationError::InvalidId(".".into()) },
    id_nested           = { direct("a/b"),                                                     ValidationError::InvalidId("a/b".into()) },
    id_absolute         = { direct("/etc"),                                                    ValidationError::InvalidId("/etc".into()) },
    id_nul              = { direct("a\0b"),                                                   ValidationError::InvalidId("a\0b".into()) },
    owner_option        = { direct("j").owner("--reference=/etc/shadow"),                     ValidationError::InvalidOwner("--reference=/etc/shadow".into()) },
    owner_with_colon    = { direct("j").owner("alice:staff"),                                  ValidationError::InvalidOwner("alice:staff".into()) },
    group_option        = { direct("j").group("-R"),                                           ValidationError::InvalidOwner("-R".into()) },
)]
fn validation_errors(request: JobRequest, expected: ValidationError) {
    assert_eq!(request.validate().unwrap_err(), expected);
}

#[test]
fn identifier_is_checked_before_workflow() {
    let err = JobRequest::new("").source("dropbox").validate().unwrap_err();
    assert_eq!(err, ValidationError::MissingId);
}

#[test]
fn workflow_is_checked_before_model() {
    let err = JobRequest::new("j").model("huge").validate().unwrap_err();
    assert_eq!(err, ValidationError::MissingInput);
}

#[test]
fn source_workflow_needs_no_link_or_language() {
    let validated = JobRequest::new("j").source("onedrive").validate().unwrap();
    assert_eq!(validated.source, Some(Source::OneDrive));
}

#[test]
fn ensure_id_generates_only_when_absent() {
    let generated = JobRequest::default().ensure_id();
    assert!(generated.id.as_deref().is_some_and(|id| !id.is_empty()));

    let explicit = JobRequest::new("").ensure_id();
    assert_eq!(explicit.id.as_deref(), Some(""));
}

#[test]
fn ownership_is_extracted() {
    let validated =
        direct("j").owner("alice").group("").permissions("0644").validate().unwrap();
    assert_eq!(validated.ownership.owner.as_deref(), Some("alice"));
    assert_eq!(validated.ownership.group, None);
    assert_eq!(validated.ownership.mode.map(|m| m.bits()), Some(0o644));
}

#[test]
fn decodes_camel_case_json() {
    let request: JobRequest = serde_json::from_value(serde_json::json!({
        "id": "job-7",
        "source": "zoom",
        "passcode": "secret",
        "withTranscription": true,
        "language": "ar",
        "model": "large-v2",
        "speakers": 3,
        "shortSummary": true,
        "downloadAudio": true,
        "permissions": 755,
    }))
    .unwrap();

    assert_eq!(request.id.as_deref(), Some("job-7"));
    assert!(request.with_transcription);
    assert!(request.short_summary);
    assert!(request.download_audio);
    assert_eq!(request.speakers, Some(Speakers::Count(3)));
    assert_eq!(request.permissions.as_deref(), Some("755"));

    let validated = request.validate().unwrap();
    assert_eq!(validated.model, Some(Model::LargeV2));
    assert_eq!(validated.ownership.mode.map(|m| m.bits()), Some(0o755));
}

#[yare::parameterized(
    flag_true   = { Speakers::Flag(true),  None },
    sentinel    = { Speakers::Count(-1),   None },
    count       = { Speakers::Count(4),    Some("4") },
)]
fn speakers_argument(speakers: Speakers, expected: Option<&str>) {
    assert_eq!(speakers.argument().as_deref(), expected);
}

#[test]
fn speakers_decode_from_bool_or_number() {
    let flag: Speakers = serde_json::from_str("true").unwrap();
    let count: Speakers = serde_json::from_str("-1").unwrap();
    assert_eq!(flag, Speakers::Flag(true));
    assert_eq!(count, Speakers::Count(-1));
    assert!(!Speakers::Flag(false).is_enabled());
}

#[test]
fn dotted_ids_that_are_plain_names_are_accepted() {
    for id in ["job.1", "...", "a..b", ".hidden"] {
        assert_eq!(direct(id).validate().unwrap().id, id);
    }
}

#[test]
fn owner_names_with_inner_dashes_are_accepted() {
    let validated = direct("j").owner("svc-scribe").group("media-rw").validate().unwrap();
    assert_eq!(validated.ownership.chown_spec().as_deref(), Some("svc-scribe:media-rw"));
}
