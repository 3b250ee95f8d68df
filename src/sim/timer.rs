//! Round countdown
//!
//! Remaining time drops by one whole second per elapsed second and stops at
//! zero. Expiry is reported once.

use serde::{Deserialize, Serialize};

/// What happened during one `advance` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerTick {
    /// Whole seconds taken off the clock
    pub decremented: u32,
    /// The clock hit zero during this call
    pub expired: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundTimer {
    remaining: f32,
    /// Time accumulated toward the next decrement
    elapsed: f32,
    expired: bool,
    urgent: bool,
}

impl RoundTimer {
    pub fn new(seconds: f32) -> Self {
        Self {
            remaining: seconds.max(0.0),
            elapsed: 0.0,
            expired: false,
            urgent: false,
        }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Advance the clock by `dt` seconds
    pub fn advance(&mut self, dt: f32) -> TimerTick {
        let mut tick = TimerTick::default();
        if self.expired {
            return tick;
        }

        self.elapsed += dt;
        while self.elapsed >= 1.0 && self.remaining > 0.0 {
            self.elapsed -= 1.0;
            self.remaining = (self.remaining - 1.0).max(0.0);
            tick.decremented += 1;
        }

        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.expired = true;
            tick.expired = true;
        }
        tick
    }

    /// Grant extra time; ignored once the round has ended
    pub fn add_bonus(&mut self, seconds: f32) {
        if !self.expired {
            self.remaining += seconds;
        }
    }

    /// Re-evaluate urgency; returns the new value when it changed
    pub fn update_urgency(&mut self, threshold: f32) -> Option<bool> {
        let urgent = self.remaining <= threshold;
        if urgent == self.urgent {
            return None;
        }
        self.urgent = urgent;
        Some(urgent)
    }

    pub fn is_urgent(&self) -> bool {
        self.urgent
    }
}
