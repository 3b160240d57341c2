//! Monotonic time adapter.
//!
//! Milliseconds since the clock was created, from `std::time::Instant`.
//! `Copy`, so every thread or task can hold its own handle on the same
//! epoch.

use std::time::Instant;

use crate::app::ports::Clock;

#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}
