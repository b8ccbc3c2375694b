use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Phases in the election lifecycle. These are never stored; they are always
/// derived from the election window and the current time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElectionPhase {
    /// Before the start time. Candidates and voters may be managed.
    Pending,
    /// Within `[start_time, end_time)`. Votes may be cast.
    Active,
    /// At or after the end time. Results are visible and may be finalized.
    Ended,
}

impl ElectionPhase {
    /// Work out the phase of an election with the given window at time `now`.
    pub fn derive(start_time: DateTime<Utc>, end_time: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if now < start_time {
            Self::Pending
        } else if now < end_time {
            Self::Active
        } else {
            Self::Ended
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    #[test]
    fn window_boundaries() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let end = start + Duration::hours(8);

        let phase = |now| ElectionPhase::derive(start, end, now);
        assert_eq!(phase(start - Duration::seconds(1)), ElectionPhase::Pending);
        assert_eq!(phase(start), ElectionPhase::Active);
        assert_eq!(phase(end - Duration::seconds(1)), ElectionPhase::Active);
        assert_eq!(phase(end), ElectionPhase::Ended);
        assert_eq!(phase(end + Duration::days(365)), ElectionPhase::Ended);
    }
}
