//! Shared reading store - the single holder of the latest reading
//!
//! The sampling loop is the only writer. Every consumer gets a copy of the
//! current value; the lock is held only for that copy, never while
//! rendering, serializing or doing I/O.

use std::sync::{Arc, Mutex, PoisonError};
use wx_station_types::Reading;

/// Latest known reading, shared by all tasks (cheap to clone)
#[derive(Clone, Default)]
pub struct ReadingStore {
    inner: Arc<Mutex<Option<Reading>>>,
}

impl ReadingStore {
    /// Create an empty store ("no reading yet")
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current reading.
    ///
    /// A poisoned lock is recovered: the protected value is a plain `Copy`
    /// snapshot, so it is always whole.
    pub fn write(&self, reading: Reading) {
        let mut current = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        *current = Some(reading);
    }

    /// Copy out the current reading, or `None` before the first write
    pub fn read(&self) -> Option<Reading> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether anything has been stored yet
    pub fn is_empty(&self) -> bool {
        self.read().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_empty_until_first_write() {
        let store = ReadingStore::new();
        assert!(store.read().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_read_returns_last_completed_write() {
        let store = ReadingStore::new();
        for i in 0..10 {
            let reading = Reading::new(20.0 + i as f64, 40.0 + i as f64);
            store.write(reading);
            assert_eq!(store.read(), Some(reading));
        }
    }

    #[test]
    fn test_snapshot_is_detached_from_store() {
        let store = ReadingStore::new();
        store.write(Reading::new(21.0, 50.0));
        let mut snapshot = store.read().unwrap();
        snapshot.temperature = Some(99.0);
        assert_eq!(store.read().unwrap().temperature, Some(21.0));
    }

    #[test]
    fn test_concurrent_readers_never_see_torn_pairs() {
        // Every write keeps humidity = temperature + 100, so any mix of two
        // writes would break the relation.
        let store = ReadingStore::new();
        let writer_store = store.clone();
        let writer = thread::spawn(move || {
            for i in 0..5_000 {
                let t = i as f64;
                writer_store.write(Reading::new(t, t + 100.0));
            }
        });

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..5_000 {
                        if let Some(reading) = store.read() {
                            let (t, h) = reading.values().unwrap();
                            assert_eq!(h, t + 100.0);
                        }
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(store.read().unwrap().values(), Some((4_999.0, 5_099.0)));
    }
}
