//! Persisted log records

use crate::reading::Reading;
use chrono::DateTime;
use chrono_tz::Tz;

/// Header row written once when the log file is created
pub const CSV_HEADER: &str = "Timestamp,Temperature (C),Humidity (%)";

/// Timestamp format used in the log file
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One timestamped row of the persisted log
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub timestamp: DateTime<Tz>,
    pub temperature: f64,
    pub humidity: f64,
}

impl LogRecord {
    /// Build a record from a reading; `None` if the reading is incomplete
    pub fn from_reading(reading: &Reading, timestamp: DateTime<Tz>) -> Option<Self> {
        reading.values().map(|(temperature, humidity)| Self {
            timestamp,
            temperature,
            humidity,
        })
    }

    /// Render as a CSV row (without line terminator)
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{:.1},{:.1}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.temperature,
            self.humidity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_csv_row() {
        let tz: Tz = "Asia/Kolkata".parse().unwrap();
        let timestamp = tz.with_ymd_and_hms(2024, 7, 1, 14, 5, 9).unwrap();
        let record = LogRecord {
            timestamp,
            temperature: 25.04,
            humidity: 61.0,
        };
        assert_eq!(record.to_csv_row(), "2024-07-01 14:05:09,25.0,61.0");
    }

    #[test]
    fn test_incomplete_reading_has_no_record() {
        let tz: Tz = "UTC".parse().unwrap();
        let mut reading = Reading::new(20.0, 50.0);
        reading.humidity = None;
        assert!(LogRecord::from_reading(&reading, chrono::Utc::now().with_timezone(&tz)).is_none());
    }
}
