//! Shared constants for the station

use std::time::Duration;

/// Sensor polling period. DHT11-class sensors cannot be read faster than every ~2s.
pub const DEFAULT_SAMPLE_PERIOD: Duration = Duration::from_secs(2);

/// Periodic log interval (10 minutes)
pub const DEFAULT_LOG_INTERVAL: Duration = Duration::from_secs(600);

/// Display refresh period
pub const DEFAULT_DISPLAY_REFRESH: Duration = Duration::from_secs(1);

/// Width of the monochrome display raster in pixels
pub const DISPLAY_WIDTH: usize = 128;

/// Height of the monochrome display raster in pixels
pub const DISPLAY_HEIGHT: usize = 64;
