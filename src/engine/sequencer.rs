//! Per-symbol sequence counter and monotonic clock source.
//!
//! The sequence number defines the total order of events for a symbol and is
//! the sole tie-breaker for time priority. Wall-clock timestamps are
//! informational only (§4.5, §4.2 "Determinism").

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// A strictly increasing, never-reused, never-rolled-back counter.
#[derive(Debug, Default)]
pub struct Sequencer {
    next: AtomicU64,
}

impl Sequencer {
    pub fn new() -> Self {
        Self { next: AtomicU64::new(1) }
    }

    /// Allocates and returns the next sequence number.
    pub fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }

    /// Advances the counter so the next allocation is strictly greater than
    /// `last_seen`. Used by bulk-load to preserve previously-assigned
    /// sequence numbers without ever rolling back or reusing one.
    pub fn fast_forward(&self, last_seen: u64) {
        self.next.fetch_max(last_seen + 1, Ordering::SeqCst);
    }
}

/// Monotonic-wall-clock timestamp in nanoseconds, used to stamp creation and
/// event emission times. Never used for ordering decisions.
pub fn now_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_nanos() as u64
}
