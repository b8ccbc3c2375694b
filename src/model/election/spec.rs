use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, WindowError};

/// An election specification: everything needed to create a new election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionSpec {
    /// Election title; must not be blank.
    pub title: String,
    /// Election description; may be empty.
    #[serde(default)]
    pub description: String,
    /// Election start time.
    pub start_time: DateTime<Utc>,
    /// Election end time.
    pub end_time: DateTime<Utc>,
}

impl ElectionSpec {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            start_time,
            end_time,
        }
    }

    /// Check this specification could be created at time `now`.
    pub fn validate(&self, now: DateTime<Utc>, min_duration: Duration) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidInput("election title must not be empty".into()));
        }
        if self.start_time <= now {
            return Err(Error::InvalidTimeWindow(WindowError::StartNotInFuture));
        }
        if self.end_time <= self.start_time {
            return Err(Error::InvalidTimeWindow(WindowError::EndNotAfterStart));
        }
        if self.end_time - self.start_time < min_duration {
            return Err(Error::InvalidTimeWindow(WindowError::TooShort {
                minimum_seconds: min_duration.num_seconds(),
            }));
        }
        Ok(())
    }
}

/// A partial update to an election's descriptive fields. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl ElectionUpdate {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: None,
        }
    }

    pub fn description(description: impl Into<String>) -> Self {
        Self {
            title: None,
            description: Some(description.into()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self.title {
            Some(ref title) if title.trim().is_empty() => Err(Error::InvalidInput(
                "election title must not be empty".into(),
            )),
            _ => Ok(()),
        }
    }
}
