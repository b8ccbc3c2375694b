use log::info;

use crate::error::{Error, Result};
use crate::model::{
    access::Capability,
    common::{AccountId, CandidateIndex, ElectionId, ElectionPhase},
    election::ResultsStatus,
    event::Action,
    results::{CandidateTally, ElectionResults},
};

use super::Ledger;

impl Ledger {
    /// Tallies of an election whose window has closed. Closing an election
    /// manually with `end_election` does not release them early.
    pub fn results(&self, election_id: ElectionId) -> Result<ElectionResults> {
        let election = self.state.election(election_id)?;
        if election.phase(self.now()) != ElectionPhase::Ended {
            return Err(Error::ResultsNotAvailable(election_id));
        }
        Ok(ElectionResults {
            election_id,
            tallies: election
                .candidates
                .iter()
                .enumerate()
                .map(|(i, c)| CandidateTally {
                    index: i as CandidateIndex,
                    name: c.name.clone(),
                    vote_count: c.vote_count,
                })
                .collect(),
            total_votes: election.total_votes,
            finalized: election.results.is_finalized(),
        })
    }

    /// Certify the results of an ended election. Tallies are not touched.
    pub fn finalize_results(&mut self, caller: &AccountId, election_id: ElectionId) -> Result<()> {
        self.authorize(caller, Capability::ManageElections)?;
        let now = self.now();
        let election = self.state.election_mut(election_id)?;
        if election.phase(now) != ElectionPhase::Ended {
            return Err(Error::ElectionStillActive(election_id));
        }
        if election.results.is_finalized() {
            return Err(Error::AlreadyFinalized(election_id));
        }

        election.results = ResultsStatus::Finalized {
            at: now,
            by: caller.clone(),
        };
        info!(
            "{caller} finalized election {election_id} with {} votes",
            election.total_votes
        );
        self.emit(Action::ResultsFinalized, caller, Some(election_id), None, now);
        Ok(())
    }
}
