//! Sensor source trait and related types

use thiserror::Error;
use wx_station_types::Sample;

/// Metadata about a sensor backend
#[derive(Debug, Clone)]
pub struct SensorMetadata {
    /// Unique identifier for this backend
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Description of the hardware behind it
    pub description: String,
}

/// Sensor failures, split by how the sampling loop must react
#[derive(Debug, Error)]
pub enum SensorError {
    /// No usable data this cycle; try again next period
    #[error("transient sensor fault: {0}")]
    Transient(String),
    /// Sensor state can no longer be trusted; the station must shut down
    #[error("fatal sensor fault: {0}")]
    Fatal(String),
    /// Hardware could not be initialized
    #[error("sensor unavailable: {0}")]
    Unavailable(String),
}

impl SensorError {
    pub fn is_transient(&self) -> bool {
        matches!(self, SensorError::Transient(_))
    }
}

/// Trait for all sensor backends
///
/// A sensor is owned exclusively by the sampling loop. `read` blocks for at
/// most the protocol's own timeout; a stall must come back as
/// [`SensorError::Transient`], not hang.
pub trait SensorSource: Send {
    /// Get metadata about this sensor
    fn metadata(&self) -> &SensorMetadata;

    /// Bring the hardware up. Called once before the station starts running.
    fn init(&mut self) -> Result<(), SensorError> {
        Ok(())
    }

    /// Blocking read of both values
    fn read(&mut self) -> Result<Sample, SensorError>;

    /// Best-effort release of the hardware handle
    fn release(&mut self) {}
}

/// Type-erased sensor for dynamic dispatch
pub type BoxedSensor = Box<dyn SensorSource>;
