use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::common::{AccountId, ElectionId};

use super::RegistrationHash;

/// A voter's registration in one election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterRecord {
    /// Commitment supplied by the registration authority.
    pub registration_hash: RegistrationHash,
    /// When the voter was registered.
    pub registered_at: DateTime<Utc>,
    /// Where the voter is in the voting lifecycle.
    pub state: VoterState,
}

/// Voter lifecycle within one election. `Voted` is terminal: there is no
/// transition out of it, so a recorded vote can never be undone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VoterState {
    Registered,
    Voted { at: DateTime<Utc> },
}

impl VoterRecord {
    /// Create a freshly registered, not-yet-voted record.
    pub fn new(registration_hash: RegistrationHash, registered_at: DateTime<Utc>) -> Self {
        Self {
            registration_hash,
            registered_at,
            state: VoterState::Registered,
        }
    }

    pub fn has_voted(&self) -> bool {
        matches!(self.state, VoterState::Voted { .. })
    }

    pub fn vote_timestamp(&self) -> Option<DateTime<Utc>> {
        match self.state {
            VoterState::Registered => None,
            VoterState::Voted { at } => Some(at),
        }
    }

    /// Move to `Voted`, failing if a vote was already recorded.
    pub(crate) fn record_vote(
        &mut self,
        election_id: ElectionId,
        voter: &AccountId,
        at: DateTime<Utc>,
    ) -> Result<()> {
        match self.state {
            VoterState::Registered => {
                self.state = VoterState::Voted { at };
                Ok(())
            }
            VoterState::Voted { .. } => Err(Error::AlreadyVoted {
                election_id,
                voter: voter.clone(),
            }),
        }
    }

    pub fn status(&self) -> VoterStatus {
        VoterStatus {
            is_registered: true,
            has_voted: self.has_voted(),
            vote_timestamp: self.vote_timestamp(),
        }
    }

    pub fn details(&self, voter: &AccountId) -> VoterDetails {
        VoterDetails {
            voter: voter.clone(),
            status: self.status(),
            registration_hash: self.registration_hash,
            registered_at: self.registered_at,
        }
    }
}

/// The publicly observable voting status of an account in an election.
/// An account that was never registered looks exactly like the default.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterStatus {
    pub is_registered: bool,
    pub has_voted: bool,
    pub vote_timestamp: Option<DateTime<Utc>>,
}

impl VoterStatus {
    /// The vote timestamp as seconds since the epoch, zero if no vote was cast.
    pub fn vote_timestamp_secs(&self) -> i64 {
        self.vote_timestamp.map(|t| t.timestamp()).unwrap_or(0)
    }
}

/// Full registration details for a registered voter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterDetails {
    pub voter: AccountId,
    #[serde(flatten)]
    pub status: VoterStatus,
    pub registration_hash: RegistrationHash,
    pub registered_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    #[test]
    fn vote_is_recorded_once() {
        let voter = AccountId::voter_example(1);
        let registered_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let voted_at = registered_at + Duration::hours(2);
        let mut record = VoterRecord::new(RegistrationHash::example(&voter), registered_at);

        assert_eq!(
            record.status(),
            VoterStatus {
                is_registered: true,
                has_voted: false,
                vote_timestamp: None,
            }
        );

        assert_eq!(record.record_vote(0, &voter, voted_at), Ok(()));
        assert_eq!(record.vote_timestamp(), Some(voted_at));

        let again = record.record_vote(0, &voter, voted_at + Duration::minutes(1));
        assert_eq!(
            again,
            Err(Error::AlreadyVoted {
                election_id: 0,
                voter: voter.clone(),
            })
        );
        // The original timestamp survives the rejected attempt.
        assert_eq!(record.vote_timestamp(), Some(voted_at));
        assert_eq!(record.status().vote_timestamp_secs(), voted_at.timestamp());
    }

    #[test]
    fn unknown_voter_status_is_all_false() {
        let status = VoterStatus::default();
        assert!(!status.is_registered);
        assert!(!status.has_voted);
        assert_eq!(status.vote_timestamp_secs(), 0);
    }
}
