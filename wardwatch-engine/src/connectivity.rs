//! Connectivity simulator: models a bedside device dropping cycles.
//!
//! While a device misses cycles its readings are assumed to be held locally,
//! tracked as an offline-buffer percentage. The buffer drains completely the
//! moment a reading is delivered again.

use crate::random::RandomSource;

/// Result of one connectivity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivityOutcome {
    /// Whether a new reading reaches the engine this tick.
    pub delivered: bool,
    /// Offline buffer percentage after this tick (0-100).
    pub buffer_pct: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectivitySimulator {
    miss_probability: f64,
    buffer_increment: u8,
}

impl ConnectivitySimulator {
    pub const DEFAULT_MISS_PROBABILITY: f64 = 0.05;
    pub const DEFAULT_BUFFER_INCREMENT: u8 = 10;

    pub fn new(miss_probability: f64, buffer_increment: u8) -> Self {
        Self {
            miss_probability: miss_probability.clamp(0.0, 1.0),
            buffer_increment,
        }
    }

    pub fn miss_probability(&self) -> f64 {
        self.miss_probability
    }

    /// Decide whether this tick's reading is delivered.
    ///
    /// Always consumes exactly one draw. A miss with a saturated buffer is
    /// delivered anyway, and delivery resets the buffer to zero.
    pub fn tick(&self, buffer_pct: u8, rng: &mut dyn RandomSource) -> ConnectivityOutcome {
        let missed = rng.chance(self.miss_probability);
        if missed && buffer_pct < 100 {
            self.record_miss(buffer_pct)
        } else {
            ConnectivityOutcome {
                delivered: true,
                buffer_pct: 0,
            }
        }
    }

    /// Outcome for a cycle that produced no reading.
    pub fn record_miss(&self, buffer_pct: u8) -> ConnectivityOutcome {
        ConnectivityOutcome {
            delivered: false,
            buffer_pct: buffer_pct.saturating_add(self.buffer_increment).min(100),
        }
    }
}

impl Default for ConnectivitySimulator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MISS_PROBABILITY, Self::DEFAULT_BUFFER_INCREMENT)
    }
}
