//! Station configuration

use anyhow::{anyhow, bail, Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use wx_station_types::{DisplayConfig, SensorConfig};

/// Current config format version
pub const CONFIG_VERSION: u32 = 1;

/// Station-wide configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    /// Version of the config format
    #[serde(default = "default_version")]
    pub version: u32,
    /// Port the status page is served on
    #[serde(default = "default_web_port")]
    pub web_port: u16,
    /// Seconds between periodic log records
    #[serde(default = "default_log_interval_secs")]
    pub log_interval_secs: u64,
    /// Sensor polling period in milliseconds
    #[serde(default = "default_sample_period_ms")]
    pub sample_period_ms: u64,
    /// CSV log file
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// IANA timezone used for the display clock and log timestamps
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Location label shown on the status page
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_web_port() -> u16 {
    8000
}

fn default_log_interval_secs() -> u64 {
    600 // 10 minutes
}

fn default_sample_period_ms() -> u64 {
    2000
}

fn default_data_file() -> PathBuf {
    PathBuf::from("sensor_data.csv")
}

fn default_timezone() -> String {
    "Asia/Kolkata".to_string()
}

fn default_location() -> String {
    "Chapra, Bihar".to_string()
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            web_port: default_web_port(),
            log_interval_secs: default_log_interval_secs(),
            sample_period_ms: default_sample_period_ms(),
            data_file: default_data_file(),
            timezone: default_timezone(),
            location: default_location(),
            sensor: SensorConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl StationConfig {
    /// Load configuration from the per-user config file (defaults if absent)
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific file path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the per-user configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("org", "wx-station", "wx-station")
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.json"))
    }

    /// Reject values the station cannot run with
    pub fn validate(&self) -> Result<()> {
        self.tz()?;
        if self.sample_period_ms == 0 {
            bail!("sample_period_ms must be greater than zero");
        }
        if self.log_interval_secs == 0 {
            bail!("log_interval_secs must be greater than zero");
        }
        if self.display.refresh_ms == 0 {
            bail!("display.refresh_ms must be greater than zero");
        }
        Ok(())
    }

    /// Parsed timezone
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow!("invalid timezone {:?}: {}", self.timezone, e))
    }

    pub fn sample_period(&self) -> Duration {
        Duration::from_millis(self.sample_period_ms)
    }

    pub fn log_interval(&self) -> Duration {
        Duration::from_secs(self.log_interval_secs)
    }

    pub fn display_refresh(&self) -> Duration {
        Duration::from_millis(self.display.refresh_ms)
    }

    pub fn splash_hold(&self) -> Duration {
        Duration::from_secs(self.display.splash_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StationConfig::default();
        assert_eq!(config.web_port, 8000);
        assert_eq!(config.log_interval(), Duration::from_secs(600));
        assert_eq!(config.sample_period(), Duration::from_secs(2));
        assert_eq!(config.display_refresh(), Duration::from_secs(1));
        assert_eq!(config.tz().unwrap(), chrono_tz::Asia::Kolkata);
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: StationConfig =
            serde_json::from_str(r#"{"web_port": 8080, "sensor": {"backend": "simulated"}}"#).unwrap();
        assert_eq!(config.web_port, 8080);
        assert_eq!(config.sensor.backend_name(), "simulated");
        assert_eq!(config.location, "Chapra, Bihar");
    }

    #[test]
    fn test_invalid_timezone_rejected() {
        let config = StationConfig {
            timezone: "Mars/Olympus_Mons".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = StationConfig {
            log_interval_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir()
            .join(format!("wx-station-config-{}", std::process::id()))
            .join("config.json");
        let config = StationConfig {
            location: "Rooftop".to_string(),
            ..Default::default()
        };
        config.save_to_path(&path).unwrap();

        let loaded = StationConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded.location, "Rooftop");
        assert_eq!(loaded.display, config.display);
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }
}
