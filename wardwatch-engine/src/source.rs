//! Reading sources.
//!
//! A [`ReadingSource`] supplies the next vitals snapshot for a patient on
//! each delivered tick. [`SimulatedSource`] runs the reading generator for
//! demo and test wards; [`SensorFeed`] holds readings pushed in from real
//! devices through a [`SensorFeedHandle`].

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use wardwatch_types::{PatientId, PatientMonitoringState, Timestamp, VitalsSnapshot};

use crate::clock::Clock;
use crate::config::WardConfig;
use crate::error::SourceError;
use crate::generator::ReadingGenerator;
use crate::random::RandomSource;

/// Trait for producing vitals for a patient on a delivered tick.
///
/// Returning `Ok(None)` means no reading arrived in time; the ward treats
/// that exactly like a missed connectivity cycle. Returning an error marks
/// a fault for that patient only.
pub trait ReadingSource: Send + Debug {
    fn next_reading(
        &mut self,
        patient: &PatientMonitoringState,
        now: Timestamp,
        rng: &mut dyn RandomSource,
    ) -> Result<Option<VitalsSnapshot>, SourceError>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;
}

/// Random-walk readings from the live generator.
#[derive(Debug, Clone, Default)]
pub struct SimulatedSource {
    generator: ReadingGenerator,
}

impl SimulatedSource {
    pub fn new(generator: ReadingGenerator) -> Self {
        Self { generator }
    }
}

impl ReadingSource for SimulatedSource {
    fn next_reading(
        &mut self,
        patient: &PatientMonitoringState,
        _now: Timestamp,
        rng: &mut dyn RandomSource,
    ) -> Result<Option<VitalsSnapshot>, SourceError> {
        Ok(Some(self.generator.next(&patient.vitals, rng)))
    }

    fn description(&self) -> &str {
        "simulated"
    }
}

#[derive(Debug, Clone, Copy)]
struct FeedReading {
    vitals: VitalsSnapshot,
    received_at: Timestamp,
}

type FeedTable = Arc<RwLock<HashMap<PatientId, FeedReading>>>;

/// Readings pushed in from bedside devices.
///
/// The feed keeps the latest reading per patient. A reading is used until it
/// is older than the stale timeout; after that (or if nothing has arrived)
/// the patient's tick counts as missed.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::time::Duration;
/// use wardwatch_engine::{ManualClock, SensorFeed};
/// use wardwatch_types::{PatientId, Timestamp, VitalsSnapshot};
///
/// let clock = Arc::new(ManualClock::new(Timestamp::from_secs(1)));
/// let (handle, feed) = SensorFeed::create("bay-3 gateway", Duration::from_secs(10), clock);
///
/// handle.push(PatientId(1), VitalsSnapshot::baseline().with_heart_rate(88));
/// assert_eq!(handle.pending(), 1);
/// ```
#[derive(Debug)]
pub struct SensorFeed {
    latest: FeedTable,
    stale_after: Duration,
    description: String,
}

/// Cloneable producer side of a [`SensorFeed`].
#[derive(Debug, Clone)]
pub struct SensorFeedHandle {
    latest: FeedTable,
    clock: Arc<dyn Clock>,
}

impl SensorFeed {
    /// Create a feed pair: the handle for device adapters, the feed for the ward.
    pub fn create(
        source_description: &str,
        stale_after: Duration,
        clock: Arc<dyn Clock>,
    ) -> (SensorFeedHandle, Self) {
        let latest: FeedTable = Arc::new(RwLock::new(HashMap::new()));
        let handle = SensorFeedHandle {
            latest: latest.clone(),
            clock,
        };
        let feed = Self {
            latest,
            stale_after,
            description: format!("sensor feed: {}", source_description),
        };
        (handle, feed)
    }

    /// Like [`create`](Self::create), with the stale timeout taken from
    /// `sensor_stale_after_ms`.
    pub fn from_config(
        source_description: &str,
        config: &WardConfig,
        clock: Arc<dyn Clock>,
    ) -> (SensorFeedHandle, Self) {
        Self::create(source_description, config.sensor_stale_after(), clock)
    }

    fn validate(patient: PatientId, vitals: &VitalsSnapshot) -> Result<(), SourceError> {
        if !vitals.temperature.is_finite() {
            return Err(SourceError::InvalidReading {
                patient,
                reason: "temperature is not a finite number".to_string(),
            });
        }
        if vitals.heart_rate == 0 {
            return Err(SourceError::InvalidReading {
                patient,
                reason: "heart rate is zero".to_string(),
            });
        }
        Ok(())
    }
}

impl ReadingSource for SensorFeed {
    fn next_reading(
        &mut self,
        patient: &PatientMonitoringState,
        now: Timestamp,
        _rng: &mut dyn RandomSource,
    ) -> Result<Option<VitalsSnapshot>, SourceError> {
        let Some(reading) = self.latest.read().get(&patient.id).copied() else {
            return Ok(None);
        };

        if now.duration_since(reading.received_at) > self.stale_after {
            return Ok(None);
        }

        Self::validate(patient.id, &reading.vitals)?;
        Ok(Some(reading.vitals))
    }

    fn description(&self) -> &str {
        &self.description
    }
}

impl SensorFeedHandle {
    /// Record the latest reading for a patient, replacing any earlier one.
    pub fn push(&self, patient: PatientId, vitals: VitalsSnapshot) {
        let received_at = self.clock.now();
        self.latest.write().insert(
            patient,
            FeedReading {
                vitals,
                received_at,
            },
        );
    }

    /// Forget a patient's reading, e.g. when its device is unplugged.
    pub fn clear(&self, patient: PatientId) -> bool {
        self.latest.write().remove(&patient).is_some()
    }

    /// Number of patients with a held reading.
    pub fn pending(&self) -> usize {
        self.latest.read().len()
    }
}
