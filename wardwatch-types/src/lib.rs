//! # wardwatch-types
//!
//! Core types for bedside vitals monitoring. This crate defines the data model
//! shared by the wardwatch engine and anything that displays or exports its
//! state: vital-sign snapshots, bounded per-patient history, triage levels,
//! alert state and the published ward roster.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Optional serialization**: Enable the `serde` feature for JSON export and config
//! - **Immutable snapshots**: A [`Roster`] is a complete, self-consistent view of the ward
//! - **Enforced bounds**: [`HistoryWindow`] never grows past its configured capacity
//!
//! ## Example
//!
//! ```rust
//! use wardwatch_types::{HistoryPoint, HistoryWindow, Timestamp, VitalsSnapshot};
//!
//! let mut history = HistoryWindow::new(2);
//! let vitals = VitalsSnapshot::baseline();
//!
//! history.append(HistoryPoint::new(Timestamp::from_millis(1_000), vitals)).unwrap();
//! history.append(HistoryPoint::new(Timestamp::from_millis(2_000), vitals)).unwrap();
//! history.append(HistoryPoint::new(Timestamp::from_millis(3_000), vitals)).unwrap();
//!
//! // Oldest point was evicted
//! assert_eq!(history.len(), 2);
//! assert_eq!(history.query(Timestamp::from_millis(2_500)).count(), 1);
//! ```
//!
//! ## Schema Version
//!
//! The current schema version is **1**. It is embedded in every [`Roster`] so
//! consumers of exported JSON can detect format changes.

mod alert;
mod history;
mod patient;
mod roster;
mod timestamp;
mod triage;
mod version;
mod vitals;

pub use alert::*;
pub use history::*;
pub use patient::*;
pub use roster::*;
pub use timestamp::*;
pub use triage::*;
pub use version::*;
pub use vitals::*;

/// Current schema version.
///
/// Increment this when making breaking changes to the roster format.
pub const SCHEMA_VERSION: u32 = 1;
