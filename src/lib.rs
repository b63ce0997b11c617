//! wx-station: a small weather station
//!
//! This library wires a temperature/humidity sensor to three independent
//! consumers of the latest reading:
//! - a monochrome status display
//! - a periodic CSV logger
//! - a web status page
//!
//! The sensor, display and scheduling building blocks live in the
//! `wx-station-*` workspace crates; this crate holds configuration, the
//! CSV sink, the web responder and the station lifecycle.

pub mod config;
pub mod csv_log;
pub mod station;
pub mod web;

// Re-export commonly used types
pub use config::StationConfig;
pub use csv_log::CsvLogSink;
pub use station::{RunningStation, Station, StationError};
