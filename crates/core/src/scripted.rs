//! Scripted sensor that replays a fixed sequence of results

use crate::data_source::{SensorError, SensorMetadata, SensorSource};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use wx_station_types::Sample;

/// Replays queued results in order, then repeats the fallback (if any).
///
/// Once the script runs dry without a fallback every read is transient.
pub struct ScriptedSensor {
    metadata: SensorMetadata,
    script: VecDeque<Result<Sample, SensorError>>,
    fallback: Option<Sample>,
    fail_init: bool,
    released: Arc<AtomicBool>,
}

impl ScriptedSensor {
    pub fn new(script: Vec<Result<Sample, SensorError>>) -> Self {
        Self {
            metadata: SensorMetadata {
                id: "scripted".to_string(),
                name: "Scripted".to_string(),
                description: "Replays a fixed sequence of sensor results".to_string(),
            },
            script: script.into(),
            fallback: None,
            fail_init: false,
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A sensor that returns `sample` forever
    pub fn repeating(sample: Sample) -> Self {
        Self::new(Vec::new()).then_repeat(sample)
    }

    /// Return `sample` after the script is exhausted
    pub fn then_repeat(mut self, sample: Sample) -> Self {
        self.fallback = Some(sample);
        self
    }

    /// Make `init` fail
    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    /// Flag set once `release` has been called
    pub fn released_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.released)
    }
}

impl SensorSource for ScriptedSensor {
    fn metadata(&self) -> &SensorMetadata {
        &self.metadata
    }

    fn init(&mut self) -> Result<(), SensorError> {
        if self.fail_init {
            return Err(SensorError::Unavailable("scripted init failure".to_string()));
        }
        Ok(())
    }

    fn read(&mut self) -> Result<Sample, SensorError> {
        match self.script.pop_front() {
            Some(result) => result,
            None => self
                .fallback
                .ok_or_else(|| SensorError::Transient("script exhausted".to_string())),
        }
    }

    fn release(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}
