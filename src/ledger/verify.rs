use chrono::Duration;
use thiserror::Error;

use crate::model::{
    common::{AccountId, ElectionId},
    election::ResultsStatus,
};

use super::LedgerState;

/// A snapshot that could not have been produced by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("Election at position {position} has ID {id}")]
    ElectionId { position: usize, id: ElectionId },
    #[error("Election {election_id} has an invalid time window")]
    TimeWindow { election_id: ElectionId },
    #[error("Election {election_id} records {recorded} candidates but has {actual}")]
    CandidateCount {
        election_id: ElectionId,
        recorded: u32,
        actual: usize,
    },
    #[error("Election {election_id} records {recorded} votes but its candidates tally {tallied}")]
    TotalVotes {
        election_id: ElectionId,
        recorded: u64,
        tallied: u64,
    },
    #[error("Election {election_id} has {voted} voters marked as voted but {total_votes} votes")]
    VotedCount {
        election_id: ElectionId,
        voted: u64,
        total_votes: u64,
    },
    #[error("Voter {voter} was registered for election {election_id} after it started")]
    RegisteredAfterStart {
        election_id: ElectionId,
        voter: AccountId,
    },
    #[error("Voter {voter} voted in election {election_id} outside its window")]
    VoteOutsideWindow {
        election_id: ElectionId,
        voter: AccountId,
    },
    #[error("Election {election_id} was finalized before it ended")]
    FinalizedBeforeEnd { election_id: ElectionId },
}

impl LedgerState {
    /// Check every invariant the ledger maintains between its stored counters,
    /// the candidate tallies, the voter records and the times at which each
    /// change happened. Elections are checked in ID order and the first
    /// violation is reported.
    ///
    /// Windows are checked against the minimum duration each election was
    /// created under, so raising the configured minimum later does not
    /// invalidate older elections.
    pub fn verify(&self) -> Result<(), VerificationError> {
        for (position, election) in self.elections.iter().enumerate() {
            let election_id = election.id;
            if usize::try_from(election_id).ok() != Some(position) {
                return Err(VerificationError::ElectionId {
                    position,
                    id: election_id,
                });
            }

            let metadata = &election.metadata;
            if metadata.start_time <= election.created_at
                || metadata.end_time <= metadata.start_time
                || metadata.end_time - metadata.start_time < election.min_duration()
                || election.min_duration() < Duration::zero()
            {
                return Err(VerificationError::TimeWindow { election_id });
            }

            if usize::try_from(election.candidate_count).ok() != Some(election.candidates.len()) {
                return Err(VerificationError::CandidateCount {
                    election_id,
                    recorded: election.candidate_count,
                    actual: election.candidates.len(),
                });
            }

            let tallied: u64 = election.candidates.iter().map(|c| c.vote_count).sum();
            if election.total_votes != tallied {
                return Err(VerificationError::TotalVotes {
                    election_id,
                    recorded: election.total_votes,
                    tallied,
                });
            }

            let voted = election.voted_count();
            if voted != election.total_votes {
                return Err(VerificationError::VotedCount {
                    election_id,
                    voted,
                    total_votes: election.total_votes,
                });
            }

            for (voter, record) in &election.voters {
                if record.registered_at >= metadata.start_time {
                    return Err(VerificationError::RegisteredAfterStart {
                        election_id,
                        voter: voter.clone(),
                    });
                }
                if let Some(at) = record.vote_timestamp() {
                    if at < metadata.start_time || at >= metadata.end_time {
                        return Err(VerificationError::VoteOutsideWindow {
                            election_id,
                            voter: voter.clone(),
                        });
                    }
                }
            }

            if let ResultsStatus::Finalized { at, .. } = election.results {
                if at < metadata.end_time {
                    return Err(VerificationError::FinalizedBeforeEnd { election_id });
                }
            }
        }
        Ok(())
    }
}
