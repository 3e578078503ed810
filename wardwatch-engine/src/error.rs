//! Error types for the ward engine.

use thiserror::Error;
use wardwatch_types::{HistoryError, PatientId};

/// Errors returned by ward commands.
///
/// These are the only failures a collaborator can observe: a command either
/// applies completely or is rejected with one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WardError {
    /// No patient with this id is on the roster.
    #[error("patient {0} not found")]
    NotFound(PatientId),

    /// The supplied fields or configuration were rejected.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors raised by a reading source.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    /// The source produced a snapshot that cannot be a real measurement.
    #[error("invalid reading for patient {patient}: {reason}")]
    InvalidReading { patient: PatientId, reason: String },

    /// The source is no longer able to produce readings.
    #[error("reading source unavailable: {0}")]
    Unavailable(String),
}

/// A failure while ticking a single patient.
///
/// The orchestrator logs these and keeps the patient's previous state; they
/// never abort the rest of the tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TickFault {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    History(#[from] HistoryError),
}
