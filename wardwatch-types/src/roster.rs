//! Roster - a point-in-time view of every monitored patient.

use crate::{PatientId, PatientMonitoringState, SchemaVersion, Timestamp, TriageLevel};

/// A published, immutable snapshot of the ward.
///
/// Rosters are produced once per tick (and once per accepted command) and
/// handed to readers whole; a reader never sees a partially updated roster.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roster {
    /// Schema version for forward compatibility.
    pub version: SchemaVersion,

    /// Number of ticks applied so far.
    pub tick: u64,

    /// When this roster was published.
    pub published_at: Timestamp,

    /// Patients in admission order.
    pub patients: Vec<PatientMonitoringState>,
}

impl Roster {
    pub fn new(patients: Vec<PatientMonitoringState>, published_at: Timestamp) -> Self {
        Self {
            version: SchemaVersion::current(),
            tick: 0,
            published_at,
            patients,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn get(&self, id: PatientId) -> Option<&PatientMonitoringState> {
        self.patients.iter().find(|p| p.id == id)
    }

    pub fn position(&self, id: PatientId) -> Option<usize> {
        self.patients.iter().position(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatientMonitoringState> {
        self.patients.iter()
    }

    /// Patients that are still being ticked.
    pub fn active(&self) -> impl Iterator<Item = &PatientMonitoringState> {
        self.patients.iter().filter(|p| !p.is_discharged())
    }

    /// The next free identifier, or `None` once `u64::MAX` is taken.
    pub fn next_id(&self) -> Option<PatientId> {
        let max = self.patients.iter().map(|p| p.id.0).max().unwrap_or(0);
        max.checked_add(1).map(PatientId)
    }

    /// Patients with a raised alert nobody has acknowledged yet.
    pub fn active_alerts(&self) -> Vec<&PatientMonitoringState> {
        self.patients.iter().filter(|p| p.alert.needs_attention()).collect()
    }

    /// Active patients critical-first, narrowed by a case-insensitive name
    /// filter, followed by every discharged patient.
    pub fn triage_ordered(&self, name_filter: &str) -> Vec<&PatientMonitoringState> {
        let needle = name_filter.to_lowercase();

        let mut active: Vec<&PatientMonitoringState> = self
            .active()
            .filter(|p| p.name().to_lowercase().contains(&needle))
            .collect();
        active.sort_by_key(|p| p.triage.display_rank());

        active.extend(self.patients.iter().filter(|p| p.is_discharged()));
        active
    }

    /// Aggregate counts and averages over active patients.
    pub fn summary(&self) -> WardSummary {
        let mut summary = WardSummary::default();
        let mut spo2_total: u64 = 0;
        let mut hr_total: u64 = 0;

        for patient in &self.patients {
            if patient.is_discharged() {
                summary.discharged += 1;
                continue;
            }

            summary.total += 1;
            match patient.triage {
                TriageLevel::Critical => summary.critical += 1,
                TriageLevel::Observe => summary.observe += 1,
                TriageLevel::Stable => summary.stable += 1,
            }
            if patient.is_device_offline() {
                summary.offline_devices += 1;
            }
            if patient.alert.needs_attention() {
                summary.unacknowledged_alerts += 1;
            }
            spo2_total += u64::from(patient.vitals.oxygen_saturation);
            hr_total += u64::from(patient.vitals.heart_rate);
        }

        if summary.total > 0 {
            let n = summary.total as f64;
            summary.average_spo2 = Some((spo2_total as f64 / n * 10.0).round() / 10.0);
            summary.average_heart_rate = Some((hr_total as f64 / n).round() as u16);
        }

        summary
    }
}

/// Ward-level statistics shown alongside the patient list.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WardSummary {
    /// Active (not discharged) patients.
    pub total: usize,
    pub critical: usize,
    pub observe: usize,
    pub stable: usize,
    pub discharged: usize,
    pub offline_devices: usize,
    pub unacknowledged_alerts: usize,
    /// Mean SpO2 to one decimal place; `None` with no active patients.
    pub average_spo2: Option<f64>,
    pub average_heart_rate: Option<u16>,
}
