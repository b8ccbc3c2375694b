use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};

/// The ledger's only source of "now". Every time-gated check reads it; callers
/// can never supply a timestamp of their own.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Copy, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Clones share the same time, so a test
/// can keep one handle while the ledger owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Move the clock forward. Going backwards is not allowed; negative
    /// durations are ignored.
    pub fn advance(&self, by: Duration) {
        if by > Duration::zero() {
            *self.now.lock().unwrap_or_else(PoisonError::into_inner) += by;
        }
    }

    /// Jump to `to`, if it is not in the past.
    pub fn set(&self, to: DateTime<Utc>) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        if to > *now {
            *now = to;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_time() {
        let clock = ManualClock::example();
        let handle = clock.clone();
        let start = clock.now();

        handle.advance(Duration::minutes(5));
        assert_eq!(clock.now(), start + Duration::minutes(5));
    }

    #[test]
    fn never_runs_backwards() {
        let clock = ManualClock::example();
        let start = clock.now();

        clock.advance(Duration::seconds(-10));
        assert_eq!(clock.now(), start);

        clock.set(start - Duration::days(1));
        assert_eq!(clock.now(), start);

        clock.set(start + Duration::days(1));
        assert_eq!(clock.now(), start + Duration::days(1));
    }

    #[test]
    fn system_clock_tracks_utc() {
        let before = Utc::now();
        let now = SystemClock.now();
        assert!(now >= before);
    }
}
