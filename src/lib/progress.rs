//! Interval-based progress logging.

use log::info;
use std::sync::atomic::{AtomicU64, Ordering};

/// Default number of items between progress messages.
pub const DEFAULT_INTERVAL: u64 = 10_000;

/// Counts processed items and logs a message each time the count crosses a multiple of the
/// interval.
///
/// The count is atomic, so a tracker can be shared between threads behind an `Arc`.
///
/// ```
/// use dagcorrect_lib::progress::ProgressTracker;
///
/// let tracker = ProgressTracker::new("Read targets").with_interval(100);
/// for _ in 0..250 {
///     tracker.log_if_needed(1); // logs at 100 and 200
/// }
/// tracker.log_final(); // logs "Read targets 250 (complete)"
/// assert_eq!(tracker.count(), 250);
/// ```
#[derive(Debug)]
pub struct ProgressTracker {
    interval: u64,
    message: String,
    count: AtomicU64,
}

impl ProgressTracker {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { interval: DEFAULT_INTERVAL, message: message.into(), count: AtomicU64::new(0) }
    }

    /// Sets the logging interval; zero is treated as one.
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// Adds `additional` items and logs every interval boundary crossed.
    ///
    /// Returns true if the resulting count sits exactly on a boundary.
    pub fn log_if_needed(&self, additional: u64) -> bool {
        let prev = self.count.fetch_add(additional, Ordering::Relaxed);
        let new_count = prev + additional;

        for milestone in (prev / self.interval + 1)..=(new_count / self.interval) {
            info!("{} {}", self.message, milestone * self.interval);
        }

        new_count > 0 && new_count.is_multiple_of(self.interval)
    }

    /// Logs the final count unless the last boundary message already reported it.
    pub fn log_final(&self) {
        let count = self.count();
        if count > 0 && !count.is_multiple_of(self.interval) {
            info!("{} {} (complete)", self.message, count);
        }
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}
