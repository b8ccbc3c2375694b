use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_MIN_DURATION;
use crate::error::{Error, Result};
use crate::model::{
    candidate::Candidate,
    common::{AccountId, CandidateIndex, ElectionId, ElectionPhase},
    voter::VoterRecord,
};

use super::{ElectionSpec, ElectionView};

/// An election, as held in the ledger, together with everything it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Election {
    /// Election unique ID.
    pub id: ElectionId,
    /// Top-level metadata.
    #[serde(flatten)]
    pub metadata: ElectionMetadata,
    /// The account that created the election.
    pub creator: AccountId,
    /// When the election was created.
    pub created_at: DateTime<Utc>,
    /// Minimum window length in force when the election was created, in seconds.
    /// Snapshots are checked against this rather than the current setting.
    #[serde(default = "default_min_duration")]
    pub min_duration: i64,
    /// Cleared when the election is closed manually. Purely informational:
    /// voting is gated by the window alone.
    pub is_active: bool,
    /// Whether the results have been certified.
    pub results: ResultsStatus,
    /// Number of candidates, maintained alongside `candidates`.
    pub candidate_count: u32,
    /// Number of accepted votes, maintained alongside the candidate tallies.
    pub total_votes: u64,
    /// Candidates, indexed by position.
    pub candidates: Vec<Candidate>,
    /// Registered voters.
    pub voters: BTreeMap<AccountId, VoterRecord>,
}

impl Election {
    /// Create a new, empty election.
    pub fn new(
        id: ElectionId,
        spec: ElectionSpec,
        creator: AccountId,
        created_at: DateTime<Utc>,
        min_duration: Duration,
    ) -> Self {
        Self {
            id,
            metadata: ElectionMetadata {
                title: spec.title,
                description: spec.description,
                start_time: spec.start_time,
                end_time: spec.end_time,
            },
            creator,
            created_at,
            min_duration: min_duration.num_seconds(),
            is_active: true,
            results: ResultsStatus::Provisional,
            candidate_count: 0,
            total_votes: 0,
            candidates: Vec::new(),
            voters: BTreeMap::new(),
        }
    }

    /// The minimum window length this election was created under.
    pub fn min_duration(&self) -> Duration {
        Duration::seconds(self.min_duration)
    }

    /// The phase of this election at time `now`.
    pub fn phase(&self, now: DateTime<Utc>) -> ElectionPhase {
        ElectionPhase::derive(self.metadata.start_time, self.metadata.end_time, now)
    }

    /// Fail unless the election is still pending, i.e. open for setup.
    pub fn ensure_pending(&self, now: DateTime<Utc>) -> Result<()> {
        match self.phase(now) {
            ElectionPhase::Pending => Ok(()),
            _ => Err(Error::ElectionAlreadyStarted(self.id)),
        }
    }

    /// Get the candidate at the given index.
    pub fn candidate(&self, index: CandidateIndex) -> Result<&Candidate> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.candidates.get(i))
            .ok_or(Error::CandidateNotFound {
                election_id: self.id,
                index,
            })
    }

    pub(crate) fn candidate_mut(&mut self, index: CandidateIndex) -> Result<&mut Candidate> {
        let election_id = self.id;
        usize::try_from(index)
            .ok()
            .and_then(|i| self.candidates.get_mut(i))
            .ok_or(Error::CandidateNotFound { election_id, index })
    }

    pub fn voter(&self, voter: &AccountId) -> Option<&VoterRecord> {
        self.voters.get(voter)
    }

    /// Number of registered voters who have cast their vote.
    pub fn voted_count(&self) -> u64 {
        self.voters.values().filter(|r| r.has_voted()).count() as u64
    }

    /// A read-only summary of this election at time `now`.
    pub fn view(&self, now: DateTime<Utc>) -> ElectionView {
        ElectionView {
            id: self.id,
            title: self.metadata.title.clone(),
            description: self.metadata.description.clone(),
            start_time: self.metadata.start_time,
            end_time: self.metadata.end_time,
            creator: self.creator.clone(),
            is_active: self.is_active,
            results_finalized: self.results.is_finalized(),
            candidate_count: self.candidate_count,
            total_votes: self.total_votes,
            phase: self.phase(now),
        }
    }
}

fn default_min_duration() -> i64 {
    i64::try_from(DEFAULT_MIN_DURATION).unwrap_or(i64::MAX)
}

/// A view on just the election's top-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionMetadata {
    /// Election title.
    pub title: String,
    /// Free text, possibly empty.
    pub description: String,
    /// Votes are accepted from this time...
    pub start_time: DateTime<Utc>,
    /// ...until just before this time.
    pub end_time: DateTime<Utc>,
}

/// Certification state of an election's results. There is no way back from `Finalized`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultsStatus {
    /// Tallies may still change (while voting is open) or are yet to be certified.
    Provisional,
    /// Tallies are certified as permanent.
    Finalized {
        at: DateTime<Utc>,
        by: AccountId,
    },
}

impl ResultsStatus {
    pub fn is_finalized(&self) -> bool {
        matches!(self, Self::Finalized { .. })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn example(id: ElectionId, now: DateTime<Utc>) -> Election {
        Election::new(
            id,
            ElectionSpec::example(),
            AccountId::admin_example(),
            now,
            Duration::hours(1),
        )
    }

    #[test]
    fn new_election_is_blank() {
        let now = ElectionSpec::example_now();
        let election = example(4, now);

        assert!(election.is_active);
        assert_eq!(election.results, ResultsStatus::Provisional);
        assert_eq!(election.candidate_count, 0);
        assert_eq!(election.total_votes, 0);
        assert_eq!(election.min_duration(), Duration::hours(1));
        assert!(election.voters.is_empty());
        assert_eq!(election.phase(now), ElectionPhase::Pending);
        assert_eq!(election.ensure_pending(now), Ok(()));
    }

    #[test]
    fn setup_closes_at_start() {
        let now = ElectionSpec::example_now();
        let election = example(4, now);
        let start = election.metadata.start_time;

        assert_eq!(
            election.ensure_pending(start),
            Err(Error::ElectionAlreadyStarted(4))
        );
        assert_eq!(
            election.ensure_pending(start + Duration::days(30)),
            Err(Error::ElectionAlreadyStarted(4))
        );
    }

    #[test]
    fn candidate_lookup_is_bounds_checked() {
        let now = ElectionSpec::example_now();
        let mut election = example(2, now);
        election.candidates.push(Candidate::new("Ada".into(), String::new()));
        election.candidate_count = 1;

        assert_eq!(election.candidate(0).map(|c| c.name.as_str()), Ok("Ada"));
        assert_eq!(
            election.candidate(1),
            Err(Error::CandidateNotFound {
                election_id: 2,
                index: 1,
            })
        );
        assert!(election.candidate(u32::MAX).is_err());
    }
}
