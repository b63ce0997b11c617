//! Sensor and display backend configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_iio_device() -> PathBuf {
    PathBuf::from("/sys/bus/iio/devices/iio:device0")
}

fn default_base_temperature() -> f64 {
    24.0
}

fn default_base_humidity() -> f64 {
    55.0
}

fn default_dropout_rate() -> f64 {
    0.1
}

/// Which sensor backend to sample
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum SensorConfig {
    /// DHT11 exposed by the Linux IIO `dht11` driver
    Iio {
        #[serde(default = "default_iio_device")]
        device: PathBuf,
    },
    /// Random walk with occasional dropouts, for running without hardware
    Simulated {
        #[serde(default = "default_base_temperature")]
        base_temperature: f64,
        #[serde(default = "default_base_humidity")]
        base_humidity: f64,
        /// Probability (0.0-1.0) that a read fails transiently
        #[serde(default = "default_dropout_rate")]
        dropout_rate: f64,
        /// Fixed RNG seed for reproducible runs
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
    },
}

impl SensorConfig {
    pub fn simulated() -> Self {
        SensorConfig::Simulated {
            base_temperature: default_base_temperature(),
            base_humidity: default_base_humidity(),
            dropout_rate: default_dropout_rate(),
            seed: None,
        }
    }

    /// Get the backend name
    pub fn backend_name(&self) -> &'static str {
        match self {
            SensorConfig::Iio { .. } => "iio",
            SensorConfig::Simulated { .. } => "simulated",
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        SensorConfig::Iio {
            device: default_iio_device(),
        }
    }
}

fn default_frame_path() -> PathBuf {
    PathBuf::from("display.pbm")
}

/// Where rendered frames go
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum DisplayBackend {
    /// 128x64 monochrome frames written as netpbm (P1) files
    Pbm {
        #[serde(default = "default_frame_path")]
        path: PathBuf,
    },
    /// One summary line per change in the log output
    Console,
}

impl Default for DisplayBackend {
    fn default() -> Self {
        DisplayBackend::Pbm {
            path: default_frame_path(),
        }
    }
}

fn default_refresh_ms() -> u64 {
    1000
}

fn default_splash() -> Vec<String> {
    vec![
        "Hello :)".to_string(),
        "Weather Station".to_string(),
    ]
}

fn default_splash_secs() -> u64 {
    3
}

/// Display consumer configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    #[serde(default)]
    pub backend: DisplayBackend,
    /// Refresh period in milliseconds
    #[serde(default = "default_refresh_ms")]
    pub refresh_ms: u64,
    /// Messages shown one after another before the first refresh
    #[serde(default = "default_splash")]
    pub splash: Vec<String>,
    /// How long each splash message stays up
    #[serde(default = "default_splash_secs")]
    pub splash_secs: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            backend: DisplayBackend::default(),
            refresh_ms: default_refresh_ms(),
            splash: default_splash(),
            splash_secs: default_splash_secs(),
        }
    }
}
