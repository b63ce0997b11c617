//! wx-station-core: Reading store, sampling loop and consumer schedulers.
//!
//! This crate contains the fundamental traits (SensorSource, Displayer,
//! LogSink), the shared ReadingStore, and the periodic tasks that move
//! readings from the sensor to every consumer.

pub mod constants;
mod data_source;
mod display_loop;
mod displayer;
mod gate;
mod logging;
mod sampling;
mod scripted;
mod shutdown;
mod sink;
mod store;

pub use constants::{
    DEFAULT_DISPLAY_REFRESH, DEFAULT_LOG_INTERVAL, DEFAULT_SAMPLE_PERIOD, DISPLAY_HEIGHT,
    DISPLAY_WIDTH,
};
pub use data_source::{BoxedSensor, SensorError, SensorMetadata, SensorSource};
pub use display_loop::DisplayConsumer;
pub use displayer::{BoxedDisplayer, DisplayError, Displayer};
pub use gate::IntervalGate;
pub use logging::LoggingConsumer;
pub use sampling::{
    first_reading_channel, CycleOutcome, FirstReadingReceiver, FirstReadingSender, SamplingLoop,
};
pub use scripted::ScriptedSensor;
pub use shutdown::Shutdown;
pub use sink::{BoxedSink, LogSink, MemorySink};
pub use store::ReadingStore;

// Re-export types used in trait signatures for convenience
pub use wx_station_types::{LogRecord, Reading, Sample};
