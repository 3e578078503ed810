//! Ward configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use wardwatch_types::DEFAULT_HISTORY_CAPACITY;

use crate::connectivity::ConnectivitySimulator;
use crate::error::WardError;

/// Tunables for a ward.
///
/// Every field has a default, so a config file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WardConfig {
    /// Period of the tick driver in milliseconds.
    pub tick_interval_ms: u64,
    /// Points kept per patient (672 is 7 days at 15-minute spacing).
    pub history_capacity: usize,
    /// Chance that a device misses a cycle.
    pub miss_probability: f64,
    /// Percentage points added to the offline buffer per missed cycle.
    pub buffer_increment: u8,
    /// Days of history backfilled for patients added at runtime.
    pub seed_history_days: u32,
    /// Patients in the demo roster.
    pub demo_patients: usize,
    /// Days of history backfilled for demo patients.
    pub demo_history_days: u32,
    /// Age after which a pushed sensor reading counts as missing.
    pub sensor_stale_after_ms: u64,
    /// Fixed random seed; absent means seed from entropy.
    pub seed: Option<u64>,
}

impl WardConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn sensor_stale_after(&self) -> Duration {
        Duration::from_millis(self.sensor_stale_after_ms)
    }

    pub fn connectivity(&self) -> ConnectivitySimulator {
        ConnectivitySimulator::new(self.miss_probability, self.buffer_increment)
    }

    pub fn validate(&self) -> Result<(), WardError> {
        if self.tick_interval_ms == 0 {
            return Err(WardError::InvalidInput(
                "tick_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.history_capacity == 0 {
            return Err(WardError::InvalidInput(
                "history_capacity must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.miss_probability) {
            return Err(WardError::InvalidInput(format!(
                "miss_probability must be within [0, 1], got {}",
                self.miss_probability
            )));
        }
        if self.buffer_increment > 100 {
            return Err(WardError::InvalidInput(format!(
                "buffer_increment must be at most 100, got {}",
                self.buffer_increment
            )));
        }
        Ok(())
    }
}

impl Default for WardConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 2_000,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            miss_probability: ConnectivitySimulator::DEFAULT_MISS_PROBABILITY,
            buffer_increment: ConnectivitySimulator::DEFAULT_BUFFER_INCREMENT,
            seed_history_days: 0,
            demo_patients: 15,
            demo_history_days: 7,
            sensor_stale_after_ms: 10_000,
            seed: None,
        }
    }
}
