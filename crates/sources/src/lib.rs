//! wx-station-sources: Sensor backends for the wx-station weather station.

mod iio;
mod simulated;

pub use iio::IioDht11Source;
pub use simulated::SimulatedSource;

use log::info;
use wx_station_core::BoxedSensor;
use wx_station_types::SensorConfig;

/// Available sensor backends: (id, human-readable name)
pub const BACKENDS: &[(&str, &str)] = &[
    ("iio", "DHT11 via Linux IIO driver"),
    ("simulated", "Simulated sensor"),
];

/// Create the sensor described by `config`.
///
/// Construction never touches hardware; that happens in `init`.
pub fn build_sensor(config: &SensorConfig) -> BoxedSensor {
    info!("Using {} sensor backend", config.backend_name());
    match config {
        SensorConfig::Iio { device } => Box::new(IioDht11Source::new(device.clone())),
        SensorConfig::Simulated {
            base_temperature,
            base_humidity,
            dropout_rate,
            seed: Some(seed),
        } => Box::new(SimulatedSource::seeded(
            *base_temperature,
            *base_humidity,
            *dropout_rate,
            *seed,
        )),
        SensorConfig::Simulated {
            base_temperature,
            base_humidity,
            dropout_rate,
            seed: None,
        } => Box::new(SimulatedSource::new(
            *base_temperature,
            *base_humidity,
            *dropout_rate,
        )),
    }
}
