//! # wardwatch-engine
//!
//! Vitals ingestion, triage classification and alert lifecycle for a
//! monitored ward.
//!
//! A [`Ward`] owns the roster of patients. Each tick runs every active
//! patient through the same pipeline (connectivity check, reading source,
//! triage classifier, history window, alert lifecycle) and publishes a new
//! immutable [`Roster`](wardwatch_types::Roster) snapshot.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use wardwatch_engine::{Output, Ward, WardConfig};
//! use wardwatch_types::NewPatientFields;
//!
//! #[tokio::main]
//! async fn main() {
//!     let ward = Ward::builder()
//!         .config(WardConfig::default())
//!         .output(Output::file("ward.json"))
//!         .demo_roster()
//!         .build()
//!         .unwrap();
//!
//!     let id = ward.add_patient(NewPatientFields::new("Jane Doe", 54)).unwrap();
//!
//!     // Tick every two seconds in the background
//!     ward.start_ticking(Duration::from_secs(2)).unwrap();
//!
//!     tokio::time::sleep(Duration::from_secs(10)).await;
//!     ward.acknowledge(id, "Nurse").unwrap();
//!     ward.stop_ticking();
//! }
//! ```
//!
//! ## Determinism
//!
//! Time and randomness are injected through [`Clock`] and [`RandomSource`].
//! With a [`ManualClock`] and a seeded or scripted random source a run is
//! fully reproducible.

pub mod alert;
pub mod classifier;
mod clock;
mod config;
mod connectivity;
pub mod demo;
mod error;
pub mod generator;
mod output;
mod pipeline;
mod random;
mod source;
mod ward;

pub use alert::AlertEvent;
pub use classifier::{classify, TriageThresholds};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::WardConfig;
pub use connectivity::{ConnectivityOutcome, ConnectivitySimulator};
pub use error::{SourceError, TickFault, WardError};
pub use generator::{Perturbation, ReadingGenerator};
pub use output::Output;
pub use pipeline::{PatientTick, Pipeline};
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use source::{ReadingSource, SensorFeed, SensorFeedHandle, SimulatedSource};
pub use ward::{HistorySlice, Ward, WardBuilder};

// Re-export types for convenience
pub use wardwatch_types::{
    Condition, HistoryPoint, HistoryRange, NewPatientFields, PatientId, PatientMonitoringState,
    Roster, Timestamp, TriageLevel, VitalsSnapshot, WardSummary,
};
