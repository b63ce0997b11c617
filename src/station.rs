//! Station lifecycle: hardware bring-up, task wiring and orderly shutdown

use crate::config::StationConfig;
use crate::web::{self, StatusPage, WebState};
use chrono_tz::Tz;
use log::{error, info, warn};
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};
use wx_station_core::{
    first_reading_channel, BoxedDisplayer, BoxedSensor, BoxedSink, DisplayConsumer, DisplayError,
    LoggingConsumer, ReadingStore, SamplingLoop, SensorError, Shutdown,
};
use wx_station_types::StationState;

/// Title shown on the status page
const PAGE_TITLE: &str = "Weather Station";

/// Faults that stop the station
#[derive(Debug, Error)]
pub enum StationError {
    #[error("invalid timezone {0:?}")]
    Timezone(String),
    #[error("sensor initialization failed: {0}")]
    SensorInit(#[source] SensorError),
    #[error("display initialization failed: {0}")]
    DisplayInit(#[source] DisplayError),
    #[error("failed to open data log: {0}")]
    LogFile(#[source] io::Error),
    #[error("failed to bind web server to port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Sensor(#[from] SensorError),
    #[error("station task panicked: {0}")]
    Task(#[from] JoinError),
}

/// Shared, logged lifecycle state
#[derive(Clone, Default)]
struct StateCell(Arc<Mutex<StationState>>);

impl StateCell {
    fn get(&self) -> StationState {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set(&self, next: StationState) {
        let mut state = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if *state == next {
            return;
        }
        if !state.can_transition_to(next) {
            warn!("Ignoring station transition {} -> {}", *state, next);
            return;
        }
        info!("Station {} -> {}", *state, next);
        *state = next;
    }
}

/// A configured station that has not been started yet
pub struct Station {
    config: StationConfig,
    timezone: Tz,
    store: ReadingStore,
    shutdown: Shutdown,
    state: StateCell,
}

impl Station {
    pub fn new(config: StationConfig) -> Result<Self, StationError> {
        let timezone = config
            .timezone
            .parse::<Tz>()
            .map_err(|_| StationError::Timezone(config.timezone.clone()))?;

        Ok(Self {
            config,
            timezone,
            store: ReadingStore::new(),
            shutdown: Shutdown::new(),
            state: StateCell::default(),
        })
    }

    pub fn state(&self) -> StationState {
        self.state.get()
    }

    /// Handle that stops the station when triggered (Ctrl-C, tests)
    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Bring up the hardware and start every task.
    ///
    /// The station only reaches `Running` if the sensor, the display, the
    /// data log and the web listener all come up. The data log is only
    /// opened once the hardware is up. Anything already initialized is
    /// released again on failure.
    pub async fn start<F>(
        self,
        mut sensor: BoxedSensor,
        mut display: BoxedDisplayer,
        open_sink: F,
    ) -> Result<RunningStation, StationError>
    where
        F: FnOnce() -> io::Result<BoxedSink>,
    {
        info!("Initializing sensor {}", sensor.metadata().name);
        if let Err(e) = sensor.init() {
            return Err(self.abort(StationError::SensorInit(e)));
        }

        info!("Initializing display {}", display.id());
        if let Err(e) = display.init() {
            sensor.release();
            return Err(self.abort(StationError::DisplayInit(e)));
        }

        let sink = match open_sink() {
            Ok(sink) => sink,
            Err(e) => {
                release_hardware(&mut sensor, &mut display);
                return Err(self.abort(StationError::LogFile(e)));
            }
        };

        let port = self.config.web_port;
        let page = StatusPage::new(PAGE_TITLE, self.config.location.clone());
        let server = match web::bind(port, WebState::new(self.store.clone(), page)) {
            Ok(server) => server,
            Err(source) => {
                release_hardware(&mut sensor, &mut display);
                return Err(self.abort(StationError::Bind { port, source }));
            }
        };
        let local_addr = server.local_addr();

        let (first_tx, first_rx) = first_reading_channel();

        let sampling = SamplingLoop::new(
            sensor,
            self.store.clone(),
            self.config.sample_period(),
            first_tx,
        );
        let logging = LoggingConsumer::new(
            sink,
            self.store.clone(),
            self.config.log_interval(),
            self.timezone,
            first_rx,
        );
        let display = DisplayConsumer::new(display, self.store.clone(), self.config.display_refresh())
            .with_splash(self.config.display.splash.clone(), self.config.splash_hold());

        let sampling = tokio::spawn(sampling.run(self.shutdown.clone()));
        let consumers = vec![
            tokio::spawn(logging.run(self.shutdown.clone())),
            tokio::spawn(display.run(self.shutdown.clone())),
            tokio::spawn(server.serve(self.shutdown.clone())),
        ];

        self.state.set(StationState::Running);
        Ok(RunningStation {
            store: self.store,
            shutdown: self.shutdown,
            state: self.state,
            local_addr,
            sampling,
            consumers,
        })
    }

    fn abort(&self, err: StationError) -> StationError {
        error!("Startup aborted: {}", err);
        self.state.set(StationState::Failed);
        err
    }
}

fn release_hardware(sensor: &mut BoxedSensor, display: &mut BoxedDisplayer) {
    sensor.release();
    if let Err(e) = display.clear() {
        warn!("Failed to clear display: {}", e);
    }
}

/// A station whose tasks are running
pub struct RunningStation {
    store: ReadingStore,
    shutdown: Shutdown,
    state: StateCell,
    local_addr: SocketAddr,
    sampling: JoinHandle<Result<(), SensorError>>,
    consumers: Vec<JoinHandle<()>>,
}

impl RunningStation {
    pub fn state(&self) -> StationState {
        self.state.get()
    }

    /// Address the web server is actually bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn store(&self) -> ReadingStore {
        self.store.clone()
    }

    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Wait until shutdown is requested or sampling hits a fatal fault,
    /// then stop every task and wait for them to release their hardware.
    pub async fn wait(self) -> Result<(), StationError> {
        let RunningStation {
            shutdown,
            state,
            mut sampling,
            consumers,
            ..
        } = self;

        let finished_early = tokio::select! {
            result = &mut sampling => Some(result),
            _ = shutdown.triggered() => None,
        };

        state.set(StationState::Stopping);
        shutdown.trigger();

        let sampling_result = match finished_early {
            Some(result) => result,
            None => sampling.await,
        };

        let mut panicked = None;
        for handle in consumers {
            if let Err(e) = handle.await {
                error!("Consumer task failed: {}", e);
                panicked.get_or_insert(e);
            }
        }

        let outcome = match (sampling_result, panicked) {
            (Ok(Ok(())), None) => Ok(()),
            (Ok(Err(e)), _) => Err(StationError::Sensor(e)),
            (Err(e), _) | (Ok(Ok(())), Some(e)) => Err(StationError::Task(e)),
        };

        match &outcome {
            Ok(()) => state.set(StationState::Stopped),
            Err(e) => {
                error!("Station stopped on fatal fault: {}", e);
                state.set(StationState::Failed);
            }
        }
        outcome
    }
}
