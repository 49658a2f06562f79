// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wall-clock source.
//!
//! Status inference compares log modification times against "now", so the
//! clock yields `SystemTime` rather than monotonic instants.

use std::time::SystemTime;

pub trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> SystemTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeClock;

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use std::sync::Arc;
    use std::time::{Duration, SystemTime};

    use parking_lot::Mutex;

    use super::Clock;

    /// Manually driven clock. Clones share the same time.
    #[derive(Debug, Clone)]
    pub struct FakeClock {
        now: Arc<Mutex<SystemTime>>,
    }

    impl FakeClock {
        /// Starts at the current wall-clock time, so real file mtimes are
        /// comparable against it.
        pub fn new() -> Self {
            Self::at(SystemTime::now())
        }

        pub fn at(time: SystemTime) -> Self {
            Self { now: Arc::new(Mutex::new(time)) }
        }

        pub fn advance(&self, by: Duration) {
            let mut now = self.now.lock();
            *now += by;
        }
    }

    impl Default for FakeClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> SystemTime {
            *self.now.lock()
        }
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
