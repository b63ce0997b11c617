//! Sampling loop - the sole writer of the reading store

use crate::data_source::{BoxedSensor, SensorError};
use crate::shutdown::Shutdown;
use crate::store::ReadingStore;
use log::{debug, error, info, trace, warn};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use wx_station_types::Reading;

/// Announces successful readings to the logging consumer until it has
/// written the first record
pub type FirstReadingSender = watch::Sender<Option<Reading>>;
/// Receiving end held by the logging consumer; dropped once the first
/// record is on disk
pub type FirstReadingReceiver = watch::Receiver<Option<Reading>>;

/// Create the channel for the first-reading log event
pub fn first_reading_channel() -> (FirstReadingSender, FirstReadingReceiver) {
    watch::channel(None)
}

/// What a single sampling cycle did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CycleOutcome {
    /// A complete reading was written to the store
    Stored(Reading),
    /// Transient failure; store left untouched
    Skipped,
}

/// Polls the sensor on a fixed period and publishes complete readings
pub struct SamplingLoop {
    /// `None` only while a read is in flight on the blocking pool
    sensor: Option<BoxedSensor>,
    store: ReadingStore,
    period: Duration,
    first_reading: Option<FirstReadingSender>,
    stored: u64,
    skipped: u64,
}

impl SamplingLoop {
    pub fn new(
        sensor: BoxedSensor,
        store: ReadingStore,
        period: Duration,
        first_reading: FirstReadingSender,
    ) -> Self {
        Self {
            sensor: Some(sensor),
            store,
            period,
            first_reading: Some(first_reading),
            stored: 0,
            skipped: 0,
        }
    }

    /// Number of cycles that stored a reading
    pub fn stored_cycles(&self) -> u64 {
        self.stored
    }

    /// Number of cycles skipped because of transient faults
    pub fn skipped_cycles(&self) -> u64 {
        self.skipped
    }

    /// Run one cycle: read, validate, publish.
    ///
    /// Only fatal faults are returned as errors; transient ones are logged
    /// and reported as [`CycleOutcome::Skipped`].
    pub async fn sample_once(&mut self) -> Result<CycleOutcome, SensorError> {
        let mut sensor = self
            .sensor
            .take()
            .ok_or_else(|| SensorError::Fatal("sensor handle lost".to_string()))?;

        let joined = tokio::task::spawn_blocking(move || {
            let result = sensor.read();
            (sensor, result)
        })
        .await;

        let result = match joined {
            Ok((sensor, result)) => {
                self.sensor = Some(sensor);
                result
            }
            Err(e) => return Err(SensorError::Fatal(format!("sensor read task failed: {}", e))),
        };

        let sample = match result {
            Ok(sample) => sample,
            Err(SensorError::Transient(reason)) => {
                warn!("Sensor read failed: {}", reason);
                self.skipped += 1;
                return Ok(CycleOutcome::Skipped);
            }
            Err(e) => return Err(e),
        };

        let Some(reading) = sample.into_reading() else {
            warn!("Sensor returned incomplete data: {:?}", sample);
            self.skipped += 1;
            return Ok(CycleOutcome::Skipped);
        };

        self.store.write(reading);
        self.stored += 1;
        trace!(
            "Stored reading: {:?}°C, {:?}%",
            reading.temperature,
            reading.humidity
        );

        if let Some(tx) = &self.first_reading {
            if tx.send(Some(reading)).is_err() {
                // Receiver dropped: the first record has been written
                debug!("First record logged, no longer announcing readings");
                self.first_reading = None;
            }
        }

        Ok(CycleOutcome::Stored(reading))
    }

    /// Run until shutdown or a fatal sensor fault.
    ///
    /// The sensor is released on every exit path.
    pub async fn run(mut self, shutdown: Shutdown) -> Result<(), SensorError> {
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Sampling sensor every {:?}", self.period);
        let outcome = loop {
            tokio::select! {
                biased;
                _ = shutdown.triggered() => break Ok(()),
                _ = ticker.tick() => {}
            }

            if let Err(e) = self.sample_once().await {
                error!("Sampling stopped: {}", e);
                break Err(e);
            }
        };

        debug!(
            "Sampling loop exiting after {} stored / {} skipped cycles",
            self.stored, self.skipped
        );
        self.release();
        outcome
    }

    fn release(&mut self) {
        if let Some(sensor) = self.sensor.as_mut() {
            info!("Releasing sensor {}", sensor.metadata().id);
            sensor.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::ScriptedSensor;
    use wx_station_types::Sample;

    fn sampler(sensor: ScriptedSensor) -> (SamplingLoop, ReadingStore, FirstReadingReceiver) {
        let store = ReadingStore::new();
        let (tx, rx) = first_reading_channel();
        let sampling = SamplingLoop::new(Box::new(sensor), store.clone(), Duration::from_secs(2), tx);
        (sampling, store, rx)
    }

    #[tokio::test]
    async fn test_transient_failures_leave_store_untouched() {
        let sensor = ScriptedSensor::new(vec![
            Ok(Sample::complete(25.0, 60.0)),
            Err(SensorError::Transient("checksum mismatch".into())),
            Err(SensorError::Transient("timeout".into())),
            Ok(Sample::complete(25.2, 61.0)),
        ]);
        let (mut sampling, store, _rx) = sampler(sensor);

        assert!(matches!(sampling.sample_once().await.unwrap(), CycleOutcome::Stored(_)));
        assert_eq!(store.read().unwrap().values(), Some((25.0, 60.0)));

        assert_eq!(sampling.sample_once().await.unwrap(), CycleOutcome::Skipped);
        assert_eq!(sampling.sample_once().await.unwrap(), CycleOutcome::Skipped);
        assert_eq!(store.read().unwrap().values(), Some((25.0, 60.0)));

        sampling.sample_once().await.unwrap();
        assert_eq!(store.read().unwrap().values(), Some((25.2, 61.0)));
        assert_eq!(sampling.stored_cycles(), 2);
        assert_eq!(sampling.skipped_cycles(), 2);
    }

    #[tokio::test]
    async fn test_missing_field_counts_as_transient() {
        let sensor = ScriptedSensor::new(vec![Ok(Sample::new(Some(22.0), None))]);
        let (mut sampling, store, _rx) = sampler(sensor);

        assert_eq!(sampling.sample_once().await.unwrap(), CycleOutcome::Skipped);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_readings_announced_until_logger_lets_go() {
        let sensor = ScriptedSensor::new(vec![
            Err(SensorError::Transient("no data".into())),
            Ok(Sample::complete(19.5, 70.0)),
            Ok(Sample::complete(19.6, 71.0)),
            Ok(Sample::complete(19.7, 72.0)),
        ]);
        let (mut sampling, _store, mut rx) = sampler(sensor);

        sampling.sample_once().await.unwrap();
        assert!(!rx.has_changed().unwrap());

        sampling.sample_once().await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().unwrap().values(), Some((19.5, 70.0)));

        sampling.sample_once().await.unwrap();
        assert_eq!(rx.borrow_and_update().unwrap().values(), Some((19.6, 71.0)));

        drop(rx);
        sampling.sample_once().await.unwrap();
        assert!(sampling.first_reading.is_none());
    }

    #[tokio::test]
    async fn test_fatal_fault_stops_loop_and_releases_sensor() {
        let sensor = ScriptedSensor::new(vec![
            Ok(Sample::complete(20.0, 50.0)),
            Err(SensorError::Fatal("bus gone".into())),
        ]);
        let released = sensor.released_flag();
        let (sampling, store, _rx) = sampler(sensor);

        let result = sampling.run(Shutdown::new()).await;
        assert!(matches!(result, Err(SensorError::Fatal(_))));
        assert_eq!(store.read().unwrap().values(), Some((20.0, 50.0)));
        assert!(released.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_shutdown_releases_sensor() {
        let sensor = ScriptedSensor::repeating(Sample::complete(20.0, 50.0));
        let released = sensor.released_flag();
        let (sampling, _store, _rx) = sampler(sensor);

        let shutdown = Shutdown::new();
        shutdown.trigger();
        sampling.run(shutdown).await.unwrap();
        assert!(released.load(std::sync::atomic::Ordering::SeqCst));
    }
}
