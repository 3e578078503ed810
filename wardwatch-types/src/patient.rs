//! Patient identity and per-patient monitoring state.

use crate::{
    Acknowledgement, AlertState, HistoryWindow, Timestamp, TriageLevel, VitalsSnapshot,
};

/// Engine-assigned patient identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PatientId(pub u64);

impl core::fmt::Display for PatientId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Clinical condition recorded by staff.
///
/// This is set externally; only `Discharged` affects the engine, which stops
/// ticking a discharged patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Condition {
    #[default]
    Stable,
    Observe,
    Critical,
    Discharged,
}

impl core::fmt::Display for Condition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Condition::Stable => "Stable",
            Condition::Observe => "Observe",
            Condition::Critical => "Critical",
            Condition::Discharged => "Discharged",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Gender {
    #[default]
    Male,
    Female,
}

/// Role of a signed-in user, as seen by collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    Admin,
    Viewer,
}

impl Role {
    /// The label recorded when a user with this role acknowledges an alert.
    pub fn acknowledger_label(&self) -> &'static str {
        match self {
            Role::Admin => "Doctor",
            Role::Viewer => "Nurse",
        }
    }
}

/// Descriptive patient and device details that the engine carries but
/// never interprets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatientProfile {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub device_serial: String,
    pub sensor_model: String,
    pub in_isolation: bool,
    /// Sensor calibration date as `YYYY-MM-DD`.
    pub calibration_date: String,
}

/// Fields supplied when admitting a new patient.
///
/// # Example
///
/// ```rust
/// use wardwatch_types::{Condition, NewPatientFields};
///
/// let fields = NewPatientFields::new("Jane Doe", 54)
///     .device_serial("SN-WARD-2001")
///     .condition(Condition::Observe)
///     .notes("Post-op day 1");
///
/// assert_eq!(fields.name, "Jane Doe");
/// assert_eq!(fields.condition, Condition::Observe);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewPatientFields {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub condition: Condition,
    pub device_serial: String,
    pub sensor_model: String,
    pub in_isolation: bool,
    pub calibration_date: String,
    pub notes: String,
}

impl NewPatientFields {
    pub fn new(name: impl Into<String>, age: u32) -> Self {
        Self {
            name: name.into(),
            age,
            ..Default::default()
        }
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    pub fn device_serial(mut self, serial: impl Into<String>) -> Self {
        self.device_serial = serial.into();
        self
    }

    pub fn sensor_model(mut self, model: impl Into<String>) -> Self {
        self.sensor_model = model.into();
        self
    }

    pub fn in_isolation(mut self, in_isolation: bool) -> Self {
        self.in_isolation = in_isolation;
        self
    }

    pub fn calibration_date(mut self, date: impl Into<String>) -> Self {
        self.calibration_date = date.into();
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Split into the descriptive profile and the mutable fields.
    pub fn into_parts(self) -> (PatientProfile, Condition, String) {
        let profile = PatientProfile {
            name: self.name,
            age: self.age,
            gender: self.gender,
            device_serial: self.device_serial,
            sensor_model: self.sensor_model,
            in_isolation: self.in_isolation,
            calibration_date: self.calibration_date,
        };
        (profile, self.condition, self.notes)
    }
}

/// Everything the engine tracks for one monitored patient.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatientMonitoringState {
    pub id: PatientId,
    pub profile: PatientProfile,
    pub condition: Condition,
    pub notes: String,
    pub admitted_at: Timestamp,

    /// Most recent delivered reading.
    pub vitals: VitalsSnapshot,
    /// Classification of `vitals`.
    pub triage: TriageLevel,
    pub history: HistoryWindow,

    /// Offline buffer fill in percent (0-100). Non-zero means the device
    /// missed one or more cycles since its last delivery.
    pub offline_buffer: u8,
    pub last_updated: Timestamp,
    pub alert: AlertState,
}

impl PatientMonitoringState {
    /// Admit a patient with the baseline snapshot, stable triage, an empty
    /// history and no alert.
    pub fn admit(
        id: PatientId,
        fields: NewPatientFields,
        now: Timestamp,
        history_capacity: usize,
    ) -> Self {
        let (profile, condition, notes) = fields.into_parts();
        Self {
            id,
            profile,
            condition,
            notes,
            admitted_at: now,
            vitals: VitalsSnapshot::baseline(),
            triage: TriageLevel::Stable,
            history: HistoryWindow::new(history_capacity),
            offline_buffer: 0,
            last_updated: now,
            alert: AlertState::Clear,
        }
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn is_discharged(&self) -> bool {
        self.condition == Condition::Discharged
    }

    pub fn is_device_offline(&self) -> bool {
        self.offline_buffer > 0
    }

    pub fn acknowledgement(&self) -> Option<&Acknowledgement> {
        self.alert.acknowledgement()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admitted_patient_defaults() {
        let patient = PatientMonitoringState::admit(
            PatientId(3),
            NewPatientFields::new("Alex Brown", 41).notes("Allergic to penicillin"),
            Timestamp::from_millis(1_000),
            672,
        );

        assert_eq!(patient.name(), "Alex Brown");
        assert_eq!(patient.vitals, VitalsSnapshot::baseline());
        assert_eq!(patient.triage, TriageLevel::Stable);
        assert_eq!(patient.alert, AlertState::Clear);
        assert!(patient.history.is_empty());
        assert_eq!(patient.history.capacity(), 672);
        assert_eq!(patient.notes, "Allergic to penicillin");
        assert!(!patient.is_device_offline());
        assert!(!patient.is_discharged());
    }

    #[test]
    fn role_labels() {
        assert_eq!(Role::Admin.acknowledger_label(), "Doctor");
        assert_eq!(Role::Viewer.acknowledger_label(), "Nurse");
    }

    #[test]
    fn patient_id_display() {
        assert_eq!(PatientId(12).to_string(), "#12");
    }
}
