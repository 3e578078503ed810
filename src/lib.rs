//! # wardwatch
//!
//! Command-line front end for the ward monitoring engine.
//!
//! The binary builds a demo ward, ticks it on a fixed interval and logs a
//! summary after every tick. This library holds the pieces it is built
//! from so they can be tested and reused:
//!
//! - **[`settings`]**: layered configuration (defaults, file, environment)
//! - **[`duration`]**: human-friendly duration strings such as `"2s"`
//! - **[`export`]**: JSON export of a roster with summary and alerts

pub mod duration;
pub mod export;
pub mod settings;

pub use wardwatch_engine as engine;
pub use wardwatch_types as types;
