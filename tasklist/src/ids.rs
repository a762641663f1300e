//! Task identifier generation.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tasklist_core::environment::{Clock, IdGenerator};

/// Millisecond timestamps, bumped by one whenever the clock has not moved on
///
/// Two tasks created within the same millisecond (or after the clock stepped
/// backwards) still get distinct, increasing identifiers.
pub struct ClockIds {
    clock: Arc<dyn Clock>,
    last: AtomicU64,
}

impl ClockIds {
    /// Creates a generator reading time from `clock`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            last: AtomicU64::new(0),
        }
    }

    fn now_millis(&self) -> u64 {
        // Pre-epoch clocks clamp to zero; the counter takes over from there
        u64::try_from(self.clock.now().timestamp_millis()).unwrap_or(0)
    }
}

impl std::fmt::Debug for ClockIds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClockIds")
            .field("last", &self.last.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl IdGenerator for ClockIds {
    fn next_id(&self) -> u64 {
        let now = self.now_millis();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last.saturating_add(1)))
            })
            .unwrap_or_else(|last| last);
        now.max(previous.saturating_add(1))
    }

    fn advance_past(&self, id: u64) {
        self.last.fetch_max(id, Ordering::SeqCst);
    }
}
