//! Append-only log sinks

use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use wx_station_types::LogRecord;

/// Destination for persisted log records.
///
/// Owned exclusively by the logging consumer. Implementations only ever
/// append; nothing is rewritten.
pub trait LogSink: Send {
    /// Append one record
    fn append(&mut self, record: &LogRecord) -> io::Result<()>;
}

/// Type-erased sink for dynamic dispatch
pub type BoxedSink = Box<dyn LogSink>;

/// Keeps records in memory; clones share the same buffer.
///
/// Can be told to fail the next N appends, which is how sink faults are
/// exercised without a real filesystem.
#[derive(Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<LogRecord>>>,
    failures_left: Arc<Mutex<usize>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` appends fail with an I/O error
    pub fn fail_next(&self, count: usize) {
        *self.failures_left.lock().unwrap_or_else(PoisonError::into_inner) = count;
    }

    /// Snapshot of everything appended so far
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for MemorySink {
    fn append(&mut self, record: &LogRecord) -> io::Result<()> {
        {
            let mut failures = self.failures_left.lock().unwrap_or_else(PoisonError::into_inner);
            if *failures > 0 {
                *failures -= 1;
                return Err(io::Error::new(io::ErrorKind::Other, "simulated sink failure"));
            }
        }
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }
}
