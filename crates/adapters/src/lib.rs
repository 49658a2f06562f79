// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for external I/O: the container runtime and host permission changes.

pub mod container;
pub mod permissions;
pub mod subprocess;

pub use container::{ContainerError, ContainerRuntime, ContainerSpec, ContainerState, DockerRuntime};
pub use permissions::{HostPermissions, PermissionAdapter, PermissionError};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use container::{ContainerCall, FakeContainerRuntime};
#[cfg(any(test, feature = "test-support"))]
pub use permissions::{FakePermissionAdapter, PermissionCall};
