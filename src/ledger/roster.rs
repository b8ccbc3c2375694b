use log::info;

use crate::error::{Error, Result};
use crate::model::{
    access::Capability,
    candidate::{Candidate, CandidateUpdate, CandidateView},
    common::{AccountId, CandidateIndex, ElectionId},
    event::{Action, Subject},
};

use super::Ledger;

impl Ledger {
    /// Append a candidate to an election that has not started, returning its index.
    pub fn add_candidate(
        &mut self,
        caller: &AccountId,
        election_id: ElectionId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<CandidateIndex> {
        self.authorize(caller, Capability::ManageElections)?;
        let now = self.now();
        let name = name.into();
        Candidate::validate_name(&name)?;
        let election = self.state.election_mut(election_id)?;
        election.ensure_pending(now)?;
        let index = election.candidate_count;
        let next_count = index
            .checked_add(1)
            .ok_or_else(|| Error::InvalidInput("too many candidates".into()))?;

        info!("{caller} added candidate {index} \"{name}\" to election {election_id}");
        election
            .candidates
            .push(Candidate::new(name, description.into()));
        election.candidate_count = next_count;
        self.emit(
            Action::CandidateAdded,
            caller,
            Some(election_id),
            Some(Subject::Candidate(index)),
            now,
        );
        Ok(index)
    }

    /// Replace the supplied fields of a candidate in an election that has not started.
    pub fn update_candidate(
        &mut self,
        caller: &AccountId,
        election_id: ElectionId,
        index: CandidateIndex,
        update: CandidateUpdate,
    ) -> Result<()> {
        self.authorize(caller, Capability::ManageElections)?;
        let now = self.now();
        update.validate()?;
        let election = self.state.election_mut(election_id)?;
        election.ensure_pending(now)?;
        let candidate = election.candidate_mut(index)?;

        if let Some(name) = update.name {
            candidate.name = name;
        }
        if let Some(description) = update.description {
            candidate.description = description;
        }
        info!("{caller} updated candidate {index} of election {election_id}");
        self.emit(
            Action::CandidateUpdated,
            caller,
            Some(election_id),
            Some(Subject::Candidate(index)),
            now,
        );
        Ok(())
    }

    pub fn candidate(&self, election_id: ElectionId, index: CandidateIndex) -> Result<CandidateView> {
        let election = self.state.election(election_id)?;
        Ok(election.candidate(index)?.view(index))
    }

    /// Every candidate of an election, in index order.
    pub fn candidates(&self, election_id: ElectionId) -> Result<Vec<CandidateView>> {
        let election = self.state.election(election_id)?;
        Ok(election
            .candidates
            .iter()
            .zip(0..)
            .map(|(candidate, index)| candidate.view(index))
            .collect())
    }
}
