//! wx-station-types: Shared data types for the wx-station weather station.
//!
//! This crate contains pure data types (readings, log records, backend
//! configs and lifecycle states) that are shared across all wx-station
//! crates. It has no runtime or hardware dependencies.

pub mod backend_configs;
pub mod format;
pub mod reading;
pub mod record;
pub mod state;

// Re-export commonly used types at the crate root for convenience
pub use backend_configs::{DisplayBackend, DisplayConfig, SensorConfig};
pub use format::{format_value, DISPLAY_PLACEHOLDER, WEB_PLACEHOLDER};
pub use reading::{Reading, Sample};
pub use record::{LogRecord, CSV_HEADER, TIMESTAMP_FORMAT};
pub use state::StationState;
