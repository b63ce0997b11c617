//! CSV log file sink
//!
//! The file is created with a header row once, then only ever appended to.
//! Each append opens the file afresh so an external rotation or a
//! temporarily missing mount does not wedge the sink.

use log::info;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use wx_station_core::LogSink;
use wx_station_types::{LogRecord, CSV_HEADER};

pub struct CsvLogSink {
    path: PathBuf,
}

impl CsvLogSink {
    /// Open (creating with header if absent) the CSV log at `path`
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        if !path.is_file() {
            let mut file = File::create(&path)?;
            writeln!(file, "{}", CSV_HEADER)?;
            info!("Created data log file: {}", path.display());
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for CsvLogSink {
    fn append(&mut self, record: &LogRecord) -> io::Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        writeln!(file, "{}", record.to_csv_row())
    }
}
