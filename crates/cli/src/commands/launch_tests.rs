// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_camel_case_request() {
    let request = parse_request(
        r#"{"id": "job-1", "link": "http://x", "language": "en", "shortSummary": true, "owner": "alice"}"#,
    )
    .unwrap();
    assert_eq!(request.id.as_deref(), Some("job-1"));
    assert!(request.short_summary);
    assert_eq!(request.owner.as_deref(), Some("alice"));
}

#[test]
fn malformed_json_is_a_validation_exit() {
    let err = parse_request("{\"id\": ").unwrap_err();
    let exit = err.downcast_ref::<ExitError>().unwrap();
    assert_eq!(exit.code, EXIT_VALIDATION);
    assert!(exit.message.starts_with("invalid job request JSON"));
}
