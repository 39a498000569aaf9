use chrono::{DateTime, TimeDelta, Utc};
use std::time::Instant;

/// A source of timestamps for the processing window of each item.
///
/// Implementations must never go backwards between calls, so that a result's
/// `received_at` is always less than or equal to its `processed_at`.
pub trait TimeSource: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// A monotonic time source aligned to wall-clock time at construction.
///
/// The clock captures `Utc::now()` and `Instant::now()` once, then reports
/// the wall-clock anchor plus the monotonic time elapsed since. This avoids
/// wall-clock adjustments (e.g., NTP steps) between the two readings a worker
/// takes for a single item.
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    anchor: Instant,
    wall: DateTime<Utc>,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            anchor: Instant::now(),
            wall: Utc::now(),
        }
    }
}

impl TimeSource for MonotonicClock {
    /// Returns the anchor plus the elapsed monotonic time.
    ///
    /// Saturates at `DateTime::<Utc>::MAX_UTC` if the sum would overflow
    /// chrono's range. That needs roughly 262 000 years of uptime, so in
    /// practice the reading is always exact.
    fn now(&self) -> DateTime<Utc> {
        TimeDelta::from_std(self.anchor.elapsed())
            .ok()
            .and_then(|elapsed| self.wall.checked_add_signed(elapsed))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}
