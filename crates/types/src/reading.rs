//! Sensor samples and the readings kept in the shared store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw result of one sensor read.
///
/// Either field may be missing; drivers report whatever the hardware gave them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
}

impl Sample {
    pub fn new(temperature: Option<f64>, humidity: Option<f64>) -> Self {
        Self {
            temperature,
            humidity,
        }
    }

    /// A sample with both values present
    pub fn complete(temperature: f64, humidity: f64) -> Self {
        Self::new(Some(temperature), Some(humidity))
    }

    /// Promote to a [`Reading`] if both values are present
    pub fn into_reading(self) -> Option<Reading> {
        match (self.temperature, self.humidity) {
            (Some(temperature), Some(humidity)) => Some(Reading::new(temperature, humidity)),
            _ => None,
        }
    }
}

/// Immutable snapshot of the latest valid sensor values.
///
/// Readings are `Copy`: consumers always get their own snapshot, never a
/// handle into the store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    /// Wall-clock time the reading was taken
    pub taken_at: DateTime<Utc>,
}

impl Reading {
    /// Create a reading timestamped now
    pub fn new(temperature: f64, humidity: f64) -> Self {
        Self::at(temperature, humidity, Utc::now())
    }

    pub fn at(temperature: f64, humidity: f64, taken_at: DateTime<Utc>) -> Self {
        Self {
            temperature: Some(temperature),
            humidity: Some(humidity),
            taken_at,
        }
    }

    /// Both values, if present
    pub fn values(&self) -> Option<(f64, f64)> {
        self.temperature.zip(self.humidity)
    }
}
