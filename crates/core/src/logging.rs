//! Logging consumer - periodic, interval-gated writes to the log sink

use crate::gate::IntervalGate;
use crate::sampling::FirstReadingReceiver;
use crate::shutdown::Shutdown;
use crate::sink::BoxedSink;
use crate::store::ReadingStore;
use chrono::Utc;
use chrono_tz::Tz;
use log::{debug, error, info};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use wx_station_types::{LogRecord, Reading};

/// Owns the log sink. Writes the latest reading once per interval, plus one
/// out-of-band record for the first successful reading.
///
/// The out-of-band record stays armed until a write succeeds, so a sink
/// fault on the first attempt is retried with the next reading.
pub struct LoggingConsumer {
    sink: BoxedSink,
    store: ReadingStore,
    interval: Duration,
    timezone: Tz,
    first_reading: Option<FirstReadingReceiver>,
}

impl LoggingConsumer {
    pub fn new(
        sink: BoxedSink,
        store: ReadingStore,
        interval: Duration,
        timezone: Tz,
        first_reading: FirstReadingReceiver,
    ) -> Self {
        Self {
            sink,
            store,
            interval,
            timezone,
            first_reading: Some(first_reading),
        }
    }

    /// Run until shutdown.
    ///
    /// The first-reading record does not touch the interval clock.
    pub async fn run(mut self, shutdown: Shutdown) {
        let start = Instant::now();
        let mut gate = IntervalGate::new(self.interval, start.into_std());
        let mut ticker = tokio::time::interval_at(start + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut first_reading = self.first_reading.take();

        info!("Logging every {:?}", self.interval);
        loop {
            tokio::select! {
                biased;
                _ = shutdown.triggered() => break,
                Some(reading) = next_unlogged(&mut first_reading) => {
                    if self.write(&reading) {
                        info!("First data point logged successfully.");
                        first_reading = None;
                    }
                }
                tick = ticker.tick() => {
                    if gate.admit(tick.into_std()) && self.log_latest() {
                        first_reading = None;
                    }
                }
            }
        }
        debug!("Logging consumer exiting");
    }

    /// One periodic cycle: log the current reading if there is one.
    /// Returns whether a record was written.
    fn log_latest(&mut self) -> bool {
        let Some(reading) = self.store.read() else {
            debug!("No reading yet, nothing to log this interval");
            return false;
        };
        let written = self.write(&reading);
        if written {
            info!(
                "Data logged at {}",
                Utc::now().with_timezone(&self.timezone).format("%H:%M:%S")
            );
        }
        written
    }

    /// Append one record stamped with the current wall-clock time.
    ///
    /// Sink faults are reported and dropped; the next interval tries again.
    fn write(&mut self, reading: &Reading) -> bool {
        let now = Utc::now().with_timezone(&self.timezone);
        let Some(record) = LogRecord::from_reading(reading, now) else {
            debug!("Skipping incomplete reading {:?}", reading);
            return false;
        };
        match self.sink.append(&record) {
            Ok(()) => true,
            Err(e) => {
                error!("Error writing to log file: {}", e);
                false
            }
        }
    }
}

/// Wait for the next successful reading while the first record is still
/// outstanding. Pending forever once it is written or sampling has stopped.
async fn next_unlogged(rx: &mut Option<FirstReadingReceiver>) -> Option<Reading> {
    let Some(receiver) = rx.as_mut() else {
        return std::future::pending().await;
    };
    match receiver.changed().await {
        Ok(()) => *receiver.borrow_and_update(),
        Err(_) => {
            *rx = None;
            None
        }
    }
}
