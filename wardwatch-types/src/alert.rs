//! Critical-alert state carried on each patient.

use crate::Timestamp;

/// Who acknowledged a critical alert, and when.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Acknowledgement {
    /// Role-derived label of the acknowledging caregiver (e.g. "Doctor").
    pub acknowledged_by: String,
    pub acknowledged_at: Timestamp,
}

impl Acknowledgement {
    pub fn new(acknowledged_by: impl Into<String>, acknowledged_at: Timestamp) -> Self {
        Self {
            acknowledged_by: acknowledged_by.into(),
            acknowledged_at,
        }
    }
}

/// Alert lifecycle state for one patient.
///
/// An alert is raised when a tick classifies the patient as critical, may be
/// acknowledged once by a caregiver, and clears on the first tick that is no
/// longer critical. Clearing discards the acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "state", rename_all = "snake_case"))]
pub enum AlertState {
    /// No active alert.
    #[default]
    Clear,
    /// Critical and waiting for a caregiver.
    Unacknowledged { raised_at: Timestamp },
    /// Critical and seen by a caregiver.
    Acknowledged {
        raised_at: Timestamp,
        acknowledgement: Acknowledgement,
    },
}

impl AlertState {
    pub fn is_active(&self) -> bool {
        !matches!(self, AlertState::Clear)
    }

    /// True while a raised alert is waiting for acknowledgement.
    pub fn needs_attention(&self) -> bool {
        matches!(self, AlertState::Unacknowledged { .. })
    }

    pub fn acknowledgement(&self) -> Option<&Acknowledgement> {
        match self {
            AlertState::Acknowledged {
                acknowledgement, ..
            } => Some(acknowledgement),
            _ => None,
        }
    }

    pub fn raised_at(&self) -> Option<Timestamp> {
        match self {
            AlertState::Clear => None,
            AlertState::Unacknowledged { raised_at }
            | AlertState::Acknowledged { raised_at, .. } => Some(*raised_at),
        }
    }

    /// Returns a short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            AlertState::Clear => "none",
            AlertState::Unacknowledged { .. } => "active",
            AlertState::Acknowledged { .. } => "acknowledged",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        assert!(!AlertState::Clear.is_active());
        assert_eq!(AlertState::Clear.raised_at(), None);

        let raised = AlertState::Unacknowledged {
            raised_at: Timestamp::from_millis(5),
        };
        assert!(raised.is_active());
        assert!(raised.needs_attention());
        assert!(raised.acknowledgement().is_none());

        let acked = AlertState::Acknowledged {
            raised_at: Timestamp::from_millis(5),
            acknowledgement: Acknowledgement::new("Nurse", Timestamp::from_millis(9)),
        };
        assert!(acked.is_active());
        assert!(!acked.needs_attention());
        assert_eq!(acked.acknowledgement().unwrap().acknowledged_by, "Nurse");
        assert_eq!(acked.raised_at(), Some(Timestamp::from_millis(5)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn tagged_json() {
        let acked = AlertState::Acknowledged {
            raised_at: Timestamp::from_millis(5),
            acknowledgement: Acknowledgement::new("Doctor", Timestamp::from_millis(9)),
        };
        let json = serde_json::to_value(&acked).unwrap();
        assert_eq!(json["state"], "acknowledged");
        assert_eq!(json["acknowledgement"]["acknowledged_by"], "Doctor");

        let parsed: AlertState = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, acked);
    }
}
