//! Exponential backoff capped at 30s, used for store watch reconnects (§5).

use std::time::Duration;

const INITIAL_DELAY: Duration = Duration::from_millis(500);
const MAX_DELAY: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy)]
pub struct Backoff {
    current: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            current: INITIAL_DELAY,
        }
    }
}

impl Backoff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the delay to wait before the next reconnect attempt, then
    /// doubles it (capped at 30s) for next time.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(MAX_DELAY);
        delay
    }

    pub fn reset(&mut self) {
        self.current = INITIAL_DELAY;
    }
}
