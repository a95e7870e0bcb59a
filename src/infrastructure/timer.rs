use crate::types::constants::{BACKOFF_FLOOR_MS, DEFAULT_MAX_BACKOFF_MS};
use std::time::Duration;

/// Timer for reconnection logic with exponential backoff
///
/// The first delay is the floor (1000 ms); each following delay doubles,
/// clamped to the ceiling. [`reset`](Self::reset) goes back to the floor.
#[derive(Debug, Clone)]
pub struct BackoffTimer {
    current_ms: u64,
    max_ms: u64,
}

impl BackoffTimer {
    pub fn new(max_ms: u64) -> Self {
        Self {
            current_ms: BACKOFF_FLOOR_MS.min(max_ms),
            max_ms,
        }
    }

    /// Get the next delay duration
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current_ms.min(self.max_ms);
        self.current_ms = self.current_ms.saturating_mul(2).min(self.max_ms);
        Duration::from_millis(delay)
    }

    /// Reset the timer
    pub fn reset(&mut self) {
        self.current_ms = BACKOFF_FLOOR_MS.min(self.max_ms);
    }
}

impl Default for BackoffTimer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BACKOFF_MS)
    }
}
