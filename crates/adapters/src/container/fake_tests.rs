// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sj_core::MountPlan;
use std::time::Duration;

fn spec(job: &str) -> ContainerSpec {
    ContainerSpec {
        job_id: JobId::new(job),
        image: "img".to_string(),
        args: vec!["--id".to_string(), job.to_string()],
        mounts: MountPlan::new(),
    }
}

#[tokio::test]
async fn wait_blocks_until_exit() {
    let runtime = FakeContainerRuntime::new();
    let id = runtime.start(&spec("a")).await.unwrap();
    assert_eq!(runtime.inspect_status(&id).await.unwrap(), ContainerState::Running);

    let waiter = {
        let runtime = runtime.clone();
        let id = id.clone();
        tokio::spawn(async move { runtime.wait_for_exit(&id).await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!waiter.is_finished());

    runtime.exit(&id, 0);
    assert_eq!(waiter.await.unwrap().unwrap(), 0);
    assert_eq!(runtime.inspect_status(&id).await.unwrap(), ContainerState::NotFound);
}

#[tokio::test]
async fn stop_exits_with_sigterm_code() {
    let runtime = FakeContainerRuntime::new();
    let id = runtime.start(&spec("b")).await.unwrap();
    let waiter = {
        let runtime = runtime.clone();
        let id = id.clone();
        tokio::spawn(async move { runtime.wait_for_exit(&id).await })
    };
    tokio::task::yield_now().await;
    runtime.stop(&id).await.unwrap();
    assert_eq!(waiter.await.unwrap().unwrap(), STOPPED_EXIT_CODE);
    assert_eq!(runtime.running_count(), 0);
}

#[tokio::test]
async fn wait_on_removed_container_is_not_found() {
    let runtime = FakeContainerRuntime::new();
    let id = runtime.start(&spec("c")).await.unwrap();
    runtime.exit(&id, 1);
    let err = runtime.wait_for_exit(&id).await.unwrap_err();
    assert!(matches!(err, ContainerError::NotFound(_)));
}

#[tokio::test]
async fn scripted_start_failure_is_one_shot() {
    let runtime = FakeContainerRuntime::new();
    runtime.fail_next_start("pull access denied");
    let err = runtime.start(&spec("d")).await.unwrap_err();
    assert_eq!(err.to_string(), "pull access denied");
    assert!(runtime.start(&spec("d")).await.is_ok());
    assert_eq!(runtime.container_for("d").map(|id| id.short().len()), Some(12));
}
