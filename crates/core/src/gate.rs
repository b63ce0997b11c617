//! Interval gate - admits at most one periodic log write per interval

use std::time::{Duration, Instant};

/// Suppresses log writes except once per configured interval.
///
/// The schedule is anchored at construction: the first write is due one
/// full interval later. Late wakeups do not cause a burst of catch-up
/// writes, and the same tick is never admitted twice.
#[derive(Debug, Clone)]
pub struct IntervalGate {
    interval: Duration,
    next_due: Instant,
    last_logged: Option<Instant>,
}

impl IntervalGate {
    pub fn new(interval: Duration, started: Instant) -> Self {
        Self {
            interval,
            next_due: started + interval,
            last_logged: None,
        }
    }

    /// When the last periodic write was admitted (never, before the first)
    pub fn last_logged(&self) -> Option<Instant> {
        self.last_logged
    }

    /// Returns `true` if a periodic write may happen at `now`, and consumes
    /// the current interval slot if so.
    pub fn admit(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.last_logged = Some(now);
        while self.next_due <= now {
            self.next_due += self.interval;
        }
        true
    }
}
