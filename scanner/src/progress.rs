//! Atomic progress counters for a scan in flight.
//!
//! This crate only tracks the counters; how often a caller renders them is
//! its own decision. [`Progress::should_render`] implements the throttling
//! rule so every caller gets the same cadence without duplicating it.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Progress counters for a directory or archive walk.
#[derive(Debug, Default)]
pub struct Progress {
    done: AtomicUsize,
    total: AtomicUsize,
}

impl Progress {
    /// A fresh, zeroed counter pair.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that one more file has been queued for processing.
    pub fn add_total(&self, n: usize) {
        self.total.fetch_add(n, Ordering::Relaxed);
    }

    /// Record that one more file has finished processing. Returns the new
    /// `done` count, for callers that want to throttle rendering on it via
    /// [`Progress::should_render`].
    pub fn advance(&self) -> usize {
        self.done.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// The current `(done, total)` snapshot.
    pub fn snapshot(&self) -> (usize, usize) {
        (
            self.done.load(Ordering::Relaxed),
            self.total.load(Ordering::Relaxed),
        )
    }

    /// Whether the counter value `done` should trigger a render: every
    /// 100th file up to 2,000, every 1,000th thereafter.
    pub fn should_render(done: usize) -> bool {
        if done == 0 {
            return false;
        }
        if done <= 2000 {
            done % 100 == 0
        } else {
            done % 1000 == 0
        }
    }
}
