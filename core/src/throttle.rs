//! Leading-edge, no-trailing cool-down gate.
//!
//! The first request in a window fires immediately; requests inside the window
//! are dropped rather than deferred to its end.

use std::cell::Cell;
use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug)]
pub struct CooldownGate {
    cooldown: Duration,
    last_fired: Cell<Option<Instant>>,
}

impl CooldownGate {
    #[must_use]
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_fired: Cell::new(None),
        }
    }

    #[must_use]
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Whether a request at `now` would fire.
    #[must_use]
    pub fn is_open(&self, now: Instant) -> bool {
        match self.last_fired.get() {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.cooldown,
        }
    }

    /// Fire if the window has elapsed, starting a new window at `now`.
    pub fn try_acquire(&self, now: Instant) -> bool {
        if !self.is_open(now) {
            return false;
        }
        self.last_fired.set(Some(now));
        true
    }
}
