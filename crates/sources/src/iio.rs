//! DHT11 sensor exposed by the Linux IIO `dht11` driver
//!
//! The kernel driver bit-bangs the single-wire protocol and publishes the
//! result in sysfs as milli-units. Every read of an input file triggers (or
//! returns a cached) measurement.

use log::{debug, info};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use wx_station_core::{SensorError, SensorMetadata, SensorSource};
use wx_station_types::Sample;

const TEMPERATURE_FILE: &str = "in_temp_input";
const HUMIDITY_FILE: &str = "in_humidityrelative_input";

// Linux errno values the driver uses for a bad or missing response
const EAGAIN: i32 = 11;
const EIO: i32 = 5;
const ETIMEDOUT: i32 = 110;

/// DHT11 behind `/sys/bus/iio/devices/iio:deviceN`
pub struct IioDht11Source {
    metadata: SensorMetadata,
    device: PathBuf,
}

impl IioDht11Source {
    pub fn new(device: impl Into<PathBuf>) -> Self {
        let device = device.into();
        Self {
            metadata: SensorMetadata {
                id: "iio".to_string(),
                name: "DHT11 (IIO)".to_string(),
                description: format!("DHT11 via Linux IIO driver at {}", device.display()),
            },
            device,
        }
    }

    pub fn device(&self) -> &Path {
        &self.device
    }

    /// Read one milli-unit input file and scale it to units
    fn read_input(&self, file: &str) -> Result<f64, SensorError> {
        let path = self.device.join(file);
        let raw = fs::read_to_string(&path).map_err(|e| classify_io_error(&path, e))?;
        let milli: i64 = raw.trim().parse().map_err(|_| {
            SensorError::Transient(format!("garbled value {:?} in {}", raw.trim(), path.display()))
        })?;
        Ok(milli as f64 / 1000.0)
    }
}

/// Map a sysfs read error onto the sampling policy
fn classify_io_error(path: &Path, error: io::Error) -> SensorError {
    let transient = matches!(error.raw_os_error(), Some(EIO) | Some(ETIMEDOUT) | Some(EAGAIN))
        || matches!(
            error.kind(),
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
        );
    if transient {
        SensorError::Transient(format!("{}: {}", path.display(), error))
    } else {
        SensorError::Fatal(format!("{}: {}", path.display(), error))
    }
}

impl SensorSource for IioDht11Source {
    fn metadata(&self) -> &SensorMetadata {
        &self.metadata
    }

    fn init(&mut self) -> Result<(), SensorError> {
        for file in [TEMPERATURE_FILE, HUMIDITY_FILE] {
            let path = self.device.join(file);
            if !path.exists() {
                return Err(SensorError::Unavailable(format!(
                    "{} not found (is the dht11 overlay loaded?)",
                    path.display()
                )));
            }
        }

        match fs::read_to_string(self.device.join("name")) {
            Ok(name) => info!("DHT11 sensor initialized successfully ({}).", name.trim()),
            Err(_) => info!("DHT11 sensor initialized successfully."),
        }
        Ok(())
    }

    fn read(&mut self) -> Result<Sample, SensorError> {
        let temperature = self.read_input(TEMPERATURE_FILE)?;
        let humidity = self.read_input(HUMIDITY_FILE)?;
        debug!("DHT11: {:.1}°C, {:.1}%", temperature, humidity);
        Ok(Sample::complete(temperature, humidity))
    }

    fn release(&mut self) {
        // The kernel driver owns the pin; nothing to hand back.
        debug!("Released DHT11 at {}", self.device.display());
    }
}
