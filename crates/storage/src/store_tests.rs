// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{Duration, TimeZone, Utc};
use sj_core::{ContainerId, JobId, Ownership};
use tempfile::tempdir;

fn record(id: &str, minute: u32) -> JobRecord {
    JobRecord {
        job_id: JobId::new(id),
        container_id: ContainerId::new(format!("c-{}", id)),
        output_path: PathBuf::from("/srv/out"),
        job_dir: PathBuf::from(format!("/srv/out/{}", id)),
        ownership: Ownership::default(),
        image: "img".to_string(),
        created_at: Utc.with_ymd_and_hms(2026, 1, 1, 12, minute, 0).unwrap(),
    }
}

#[test]
fn put_get_delete_round_trip_on_disk() {
    let dir = tempdir().unwrap();
    let store = JobStore::open(dir.path()).unwrap();
    store.put(record("a", 0)).unwrap();

    let reopened = JobStore::open(dir.path()).unwrap();
    assert_eq!(reopened.get("a").unwrap(), Some(record("a", 0)));
    assert!(reopened.contains("a").unwrap());

    assert_eq!(reopened.delete("a").unwrap(), Some(record("a", 0)));
    assert_eq!(store.get("a").unwrap(), None);
    assert_eq!(store.delete("a").unwrap(), None);
}

#[test]
fn list_is_newest_first() {
    let store = JobStore::in_memory();
    store.put(record("old", 1)).unwrap();
    store.put(record("new", 30)).unwrap();
    store.put(record("mid", 10)).unwrap();

    let ids: Vec<String> = store.list().unwrap().into_iter().map(|r| r.job_id.to_string()).collect();
    assert_eq!(ids, vec!["new", "mid", "old"]);
}

#[test]
fn delete_all_returns_count_and_keeps_pending() {
    let store = JobStore::in_memory();
    store.put(record("a", 0)).unwrap();
    store.put(record("b", 1)).unwrap();
    store.add_pending(PendingReconcile::for_record(&record("a", 0), Utc::now())).unwrap();

    assert_eq!(store.delete_all().unwrap(), 2);
    assert!(store.list().unwrap().is_empty());
    assert_eq!(store.pending().unwrap().len(), 1);
}

#[test]
fn pending_entries_survive_reopen_and_are_oldest_first() {
    let dir = tempdir().unwrap();
    let store = JobStore::open(dir.path()).unwrap();
    let now = Utc::now();
    store.add_pending(PendingReconcile::for_record(&record("late", 0), now)).unwrap();
    store
        .add_pending(PendingReconcile::for_record(&record("early", 0), now - Duration::seconds(5)))
        .unwrap();

    let reopened = JobStore::open(dir.path()).unwrap();
    let ids: Vec<String> =
        reopened.pending().unwrap().into_iter().map(|p| p.job_id.to_string()).collect();
    assert_eq!(ids, vec!["early", "late"]);

    assert!(reopened.remove_pending("early").unwrap());
    assert!(!reopened.remove_pending("early").unwrap());
    assert_eq!(store.pending().unwrap().len(), 1);
}

#[test]
fn writes_from_another_handle_are_visible() {
    let dir = tempdir().unwrap();
    let first = JobStore::open(dir.path()).unwrap();
    let second = JobStore::open(dir.path()).unwrap();

    first.put(record("a", 0)).unwrap();
    second.put(record("b", 1)).unwrap();

    assert_eq!(first.list().unwrap().len(), 2);
}

#[test]
fn corrupt_file_is_reported() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(STATE_FILE_NAME), "{not json").unwrap();
    let err = JobStore::open(dir.path()).err().unwrap();
    assert!(matches!(err, StoreError::Json { .. }));
}

#[test]
fn future_version_is_rejected() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(STATE_FILE_NAME), r#"{"v": 99}"#).unwrap();
    let err = JobStore::open(dir.path()).err().unwrap();
    assert!(matches!(err, StoreError::Version(99)));
}

#[test]
fn no_temp_file_left_behind() {
    let dir = tempdir().unwrap();
    let store = JobStore::open(dir.path()).unwrap();
    store.put(record("a", 0)).unwrap();
    store.put(record("b", 1)).unwrap();
    assert!(dir.path().join(STATE_FILE_NAME).exists());
    assert!(dir.path().join(LOCK_FILE_NAME).exists());
    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "temp files left: {:?}", leftovers);
}

#[test]
fn concurrent_handles_do_not_lose_writes() {
    let dir = tempdir().unwrap();
    let handles: Vec<_> = (0..2)
        .map(|writer| {
            let store = JobStore::open(dir.path()).unwrap();
            std::thread::spawn(move || {
                for i in 0..100u32 {
                    store.put(record(&format!("w{}-{}", writer, i), i % 60)).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let store = JobStore::open(dir.path()).unwrap();
    assert_eq!(store.list().unwrap().len(), 200);
}

#[test]
fn pending_removal_keeps_job_recorded_by_another_handle() {
    let dir = tempdir().unwrap();
    let waiting = JobStore::open(dir.path()).unwrap();
    let launching = JobStore::open(dir.path()).unwrap();
    waiting.add_pending(PendingReconcile::for_record(&record("a", 0), Utc::now())).unwrap();

    launching.put(record("b", 1)).unwrap();
    assert!(waiting.remove_pending("a").unwrap());

    assert!(launching.contains("b").unwrap());
    assert!(waiting.pending().unwrap().is_empty());
}

#[test]
fn insert_new_refuses_taken_ids() {
    let dir = tempdir().unwrap();
    let first = JobStore::open(dir.path()).unwrap();
    let second = JobStore::open(dir.path()).unwrap();

    assert!(first.insert_new(record("a", 0)).unwrap());
    assert!(!second.insert_new(record("a", 5)).unwrap());
    assert_eq!(first.get("a").unwrap(), Some(record("a", 0)));
}
