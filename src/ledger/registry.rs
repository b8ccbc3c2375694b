use log::{debug, info};

use crate::error::{Error, Result};
use crate::model::{
    access::Capability,
    common::{AccountId, ElectionId},
    election::{Election, ElectionSpec, ElectionUpdate, ElectionView},
    event::Action,
};

use super::Ledger;

impl Ledger {
    /// Create a new election, returning its ID.
    pub fn create_election(&mut self, caller: &AccountId, spec: ElectionSpec) -> Result<ElectionId> {
        self.authorize(caller, Capability::ManageElections)?;
        let now = self.now();
        spec.validate(now, self.min_duration)?;
        let id = ElectionId::try_from(self.state.elections.len())
            .map_err(|_| Error::InvalidInput("election ID space exhausted".into()))?;

        info!(
            "{caller} created election {id} \"{}\" ({} to {})",
            spec.title, spec.start_time, spec.end_time
        );
        self.state
            .elections
            .push(Election::new(id, spec, caller.clone(), now, self.min_duration));
        self.emit(Action::ElectionCreated, caller, Some(id), None, now);
        Ok(id)
    }

    /// Replace the supplied descriptive fields of an election that has not started.
    pub fn update_election(
        &mut self,
        caller: &AccountId,
        id: ElectionId,
        update: ElectionUpdate,
    ) -> Result<()> {
        self.authorize(caller, Capability::ManageElections)?;
        let now = self.now();
        update.validate()?;
        let election = self.state.election_mut(id)?;
        election.ensure_pending(now)?;

        if let Some(title) = update.title {
            election.metadata.title = title;
        }
        if let Some(description) = update.description {
            election.metadata.description = description;
        }
        info!("{caller} updated election {id}");
        self.emit(Action::ElectionUpdated, caller, Some(id), None, now);
        Ok(())
    }

    /// Mark an election as manually closed. This is informational only: the
    /// window still decides when votes are accepted and results released.
    /// Ending an already-ended election does nothing.
    pub fn end_election(&mut self, caller: &AccountId, id: ElectionId) -> Result<()> {
        self.authorize(caller, Capability::ManageElections)?;
        let now = self.now();
        let election = self.state.election_mut(id)?;
        if !election.is_active {
            debug!("Election {id} was already ended");
            return Ok(());
        }
        election.is_active = false;
        info!("{caller} ended election {id}");
        self.emit(Action::ElectionEnded, caller, Some(id), None, now);
        Ok(())
    }

    /// A summary of the given election, as of now.
    pub fn election_summary(&self, id: ElectionId) -> Result<ElectionView> {
        Ok(self.state.election(id)?.view(self.now()))
    }

    /// Number of elections ever created. IDs run from zero to one less than this.
    pub fn election_count(&self) -> u32 {
        self.state.elections.len() as u32
    }

    /// Summaries of every election, in ID order.
    pub fn elections(&self) -> Vec<ElectionView> {
        let now = self.now();
        self.state.elections.iter().map(|e| e.view(now)).collect()
    }
}
