//! Per-patient tick pipeline: connectivity, generate, classify, record, alert.

use wardwatch_types::{HistoryPoint, PatientMonitoringState, Timestamp};

use crate::alert::{self, AlertEvent};
use crate::classifier::TriageThresholds;
use crate::connectivity::ConnectivitySimulator;
use crate::error::TickFault;
use crate::random::RandomSource;
use crate::source::ReadingSource;

/// Result of ticking one patient.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientTick {
    pub state: PatientMonitoringState,
    /// Alert transition caused by this tick, if any.
    pub event: Option<AlertEvent>,
    /// False when the cycle was missed and only the buffer moved.
    pub delivered: bool,
}

/// Stages shared by every patient in a tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pipeline {
    pub connectivity: ConnectivitySimulator,
    pub thresholds: TriageThresholds,
}

impl Pipeline {
    pub fn new(connectivity: ConnectivitySimulator, thresholds: TriageThresholds) -> Self {
        Self {
            connectivity,
            thresholds,
        }
    }

    /// Compute the next state of `patient` without touching the original.
    ///
    /// On error the caller keeps `patient` as it was.
    pub fn tick_patient(
        &self,
        patient: &PatientMonitoringState,
        now: Timestamp,
        source: &mut dyn ReadingSource,
        rng: &mut dyn RandomSource,
    ) -> Result<PatientTick, TickFault> {
        let link = self.connectivity.tick(patient.offline_buffer, rng);
        if !link.delivered {
            return Ok(Self::missed(patient, link.buffer_pct));
        }

        let Some(vitals) = source.next_reading(patient, now, rng)? else {
            let link = self.connectivity.record_miss(patient.offline_buffer);
            return Ok(Self::missed(patient, link.buffer_pct));
        };

        let triage = self.thresholds.classify(&vitals);

        let mut history = patient.history.clone();
        history.append(HistoryPoint::new(now, vitals))?;

        let (alert, event) = alert::advance(&patient.alert, triage, now);

        Ok(PatientTick {
            state: PatientMonitoringState {
                vitals,
                triage,
                history,
                offline_buffer: link.buffer_pct,
                last_updated: now,
                alert,
                ..patient.clone()
            },
            event,
            delivered: true,
        })
    }

    fn missed(patient: &PatientMonitoringState, buffer_pct: u8) -> PatientTick {
        PatientTick {
            state: PatientMonitoringState {
                offline_buffer: buffer_pct,
                ..patient.clone()
            },
            event: None,
            delivered: false,
        }
    }
}
