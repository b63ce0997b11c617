//! Simulated sensor for running the station without hardware
//!
//! Produces a slow random walk around configurable base values and drops a
//! fraction of reads the way a flaky single-wire sensor does.

use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use wx_station_core::{SensorError, SensorMetadata, SensorSource};
use wx_station_types::Sample;

/// Max drift of the walk away from its base value
const TEMPERATURE_SPAN: f64 = 5.0;
const HUMIDITY_SPAN: f64 = 15.0;

pub struct SimulatedSource {
    metadata: SensorMetadata,
    rng: StdRng,
    base_temperature: f64,
    base_humidity: f64,
    temperature: f64,
    humidity: f64,
    dropout_rate: f64,
}

impl SimulatedSource {
    pub fn new(base_temperature: f64, base_humidity: f64, dropout_rate: f64) -> Self {
        Self::with_rng(
            base_temperature,
            base_humidity,
            dropout_rate,
            StdRng::from_entropy(),
        )
    }

    /// Deterministic variant
    pub fn seeded(base_temperature: f64, base_humidity: f64, dropout_rate: f64, seed: u64) -> Self {
        Self::with_rng(
            base_temperature,
            base_humidity,
            dropout_rate,
            StdRng::seed_from_u64(seed),
        )
    }

    fn with_rng(base_temperature: f64, base_humidity: f64, dropout_rate: f64, rng: StdRng) -> Self {
        Self {
            metadata: SensorMetadata {
                id: "simulated".to_string(),
                name: "Simulated".to_string(),
                description: "Random walk temperature/humidity generator".to_string(),
            },
            rng,
            base_temperature,
            base_humidity,
            temperature: base_temperature,
            humidity: base_humidity,
            dropout_rate: dropout_rate.clamp(0.0, 1.0),
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl SensorSource for SimulatedSource {
    fn metadata(&self) -> &SensorMetadata {
        &self.metadata
    }

    fn read(&mut self) -> Result<Sample, SensorError> {
        if self.rng.gen_bool(self.dropout_rate) {
            return Err(SensorError::Transient(
                "sensor did not respond (simulated)".to_string(),
            ));
        }

        self.temperature = (self.temperature + self.rng.gen_range(-0.3..=0.3)).clamp(
            self.base_temperature - TEMPERATURE_SPAN,
            self.base_temperature + TEMPERATURE_SPAN,
        );
        self.humidity = (self.humidity + self.rng.gen_range(-1.0..=1.0))
            .clamp(
                self.base_humidity - HUMIDITY_SPAN,
                self.base_humidity + HUMIDITY_SPAN,
            )
            .clamp(0.0, 100.0);

        trace!("Simulated {:.2}°C {:.2}%", self.temperature, self.humidity);
        Ok(Sample::complete(round1(self.temperature), round1(self.humidity)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_stay_near_base() {
        let mut sensor = SimulatedSource::seeded(24.0, 55.0, 0.0, 7);
        for _ in 0..1_000 {
            let (t, h) = sensor.read().unwrap().into_reading().unwrap().values().unwrap();
            assert!((19.0..=29.0).contains(&t), "temperature {} out of range", t);
            assert!((40.0..=70.0).contains(&h), "humidity {} out of range", h);
        }
    }

    #[test]
    fn test_full_dropout_is_always_transient() {
        let mut sensor = SimulatedSource::seeded(24.0, 55.0, 1.0, 7);
        for _ in 0..10 {
            assert!(sensor.read().unwrap_err().is_transient());
        }
    }

    #[test]
    fn test_some_reads_drop_out() {
        let mut sensor = SimulatedSource::seeded(24.0, 55.0, 0.5, 42);
        let failures = (0..200).filter(|_| sensor.read().is_err()).count();
        assert!(failures > 0 && failures < 200);
    }
}
