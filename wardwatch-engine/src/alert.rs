//! Alert lifecycle transitions.
//!
//! ```text
//!            Critical                 acknowledge()
//!   Clear ───────────▶ Unacknowledged ─────────────▶ Acknowledged
//!     ▲                      │                            │
//!     └──────────────────────┴────────────────────────────┘
//!                    tick classified not Critical
//! ```
//!
//! Staying critical keeps whichever active state the alert is in; there is
//! no re-alerting. Recovery always discards the acknowledgement, so a later
//! relapse raises a fresh unacknowledged alert.

use wardwatch_types::{Acknowledgement, AlertState, Timestamp, TriageLevel};

/// What changed when the lifecycle advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertEvent {
    Raised,
    Cleared,
}

/// Advance `state` after a tick classified the patient as `level`.
pub fn advance(
    state: &AlertState,
    level: TriageLevel,
    now: Timestamp,
) -> (AlertState, Option<AlertEvent>) {
    match (state, level.is_critical()) {
        (AlertState::Clear, true) => (
            AlertState::Unacknowledged { raised_at: now },
            Some(AlertEvent::Raised),
        ),
        (AlertState::Clear, false) => (AlertState::Clear, None),
        (active, true) => (active.clone(), None),
        (_, false) => (AlertState::Clear, Some(AlertEvent::Cleared)),
    }
}

/// Record a caregiver acknowledgement.
///
/// Returns `None` (no change) unless the alert is raised and not yet
/// acknowledged, so repeated acknowledgements keep the first record.
pub fn acknowledge(state: &AlertState, actor: &str, now: Timestamp) -> Option<AlertState> {
    match state {
        AlertState::Unacknowledged { raised_at } => Some(AlertState::Acknowledged {
            raised_at: *raised_at,
            acknowledgement: Acknowledgement::new(actor, now),
        }),
        _ => None,
    }
}
