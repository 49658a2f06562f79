// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashMap;

#[test]
fn generated_ids_are_unique_uuids() {
    let a = JobId::generate();
    let b = JobId::generate();
    assert_ne!(a, b);
    assert_eq!(a.as_str().len(), 36);
}

#[test]
fn hash_map_lookup_by_str() {
    let mut map = HashMap::new();
    map.insert(JobId::new("job-1"), 42);
    assert_eq!(map.get("job-1"), Some(&42));
}

#[test]
fn serializes_transparently() {
    let id = JobId::new("job-1");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"job-1\"");
}

#[yare::parameterized(
    truncates     = { "abcdefghij", 4, "abcd" },
    exact         = { "abcd",       4, "abcd" },
    shorter       = { "ab",         4, "ab" },
    multibyte     = { "ééééé",      2, "éé" },
)]
fn short_truncates_on_char_boundary(input: &str, n: usize, expected: &str) {
    assert_eq!(JobId::new(input).short(n), expected);
}

#[test]
fn container_id_short_form() {
    let id = ContainerId::new("4f1c2a9be0d3771a2c5e");
    assert_eq!(id.short(), "4f1c2a9be0d3");
    assert_eq!(ContainerId::new("abc").short(), "abc");
}
