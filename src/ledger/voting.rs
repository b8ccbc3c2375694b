use log::{debug, info};

use crate::error::{Error, Result};
use crate::model::{
    common::{AccountId, CandidateIndex, ElectionId, ElectionPhase},
    election::Election,
    event::{Action, Subject},
};

use super::Ledger;

impl Ledger {
    /// Cast the caller's single vote for a candidate. The caller is the voter;
    /// no role is needed, only a registration that has not yet been used.
    pub fn cast_vote(
        &mut self,
        caller: &AccountId,
        election_id: ElectionId,
        candidate: CandidateIndex,
    ) -> Result<()> {
        let now = self.now();
        let election = self.state.election_mut(election_id)?;
        match election.phase(now) {
            ElectionPhase::Pending => return Err(Error::ElectionNotStarted(election_id)),
            ElectionPhase::Ended => return Err(Error::ElectionEnded(election_id)),
            ElectionPhase::Active => {}
        }
        let Election {
            candidates,
            voters,
            total_votes,
            ..
        } = election;
        let record = voters
            .get_mut(caller)
            .ok_or_else(|| Error::VoterNotRegistered {
                election_id,
                voter: caller.clone(),
            })?;
        let tally = match usize::try_from(candidate)
            .ok()
            .and_then(|i| candidates.get_mut(i))
        {
            Some(tally) => tally,
            // An earlier vote takes precedence over a bad index.
            None if record.has_voted() => {
                return Err(Error::AlreadyVoted {
                    election_id,
                    voter: caller.clone(),
                })
            }
            None => {
                return Err(Error::CandidateNotFound {
                    election_id,
                    index: candidate,
                })
            }
        };

        // Check-and-set: the first write, and the last point of failure.
        record
            .record_vote(election_id, caller, now)
            .map_err(|err| {
                debug!("{caller} tried to vote twice in election {election_id}");
                err
            })?;
        tally.vote_count += 1;
        *total_votes += 1;

        info!("{caller} voted in election {election_id}");
        self.emit(
            Action::VoteCast,
            caller,
            Some(election_id),
            Some(Subject::Account(caller.clone())),
            now,
        );
        Ok(())
    }
}
