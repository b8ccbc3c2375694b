use std::collections::BTreeSet;

use log::info;

use crate::error::{Error, Result};
use crate::model::{
    access::Capability,
    common::{AccountId, ElectionId},
    event::{Action, Subject},
    voter::{RegistrationHash, VoterDetails, VoterRecord, VoterStatus},
};

use super::Ledger;

impl Ledger {
    /// Register a voter for an election that has not started. Registration is
    /// create-once: an existing record is never overwritten.
    pub fn register_voter(
        &mut self,
        caller: &AccountId,
        election_id: ElectionId,
        voter: AccountId,
        registration_hash: RegistrationHash,
    ) -> Result<()> {
        self.batch_register_voters(caller, election_id, vec![voter], vec![registration_hash])
    }

    /// Register several voters at once. Either every entry is registered or,
    /// if any entry would be rejected, none are.
    pub fn batch_register_voters(
        &mut self,
        caller: &AccountId,
        election_id: ElectionId,
        voters: Vec<AccountId>,
        hashes: Vec<RegistrationHash>,
    ) -> Result<()> {
        self.authorize(caller, Capability::ManageElections)?;
        let now = self.now();
        if voters.len() != hashes.len() {
            return Err(Error::InvalidInput(format!(
                "{} voters but {} registration hashes",
                voters.len(),
                hashes.len()
            )));
        }
        let election = self.state.election_mut(election_id)?;
        election.ensure_pending(now)?;

        // Validate the whole batch before touching anything.
        let mut seen = BTreeSet::new();
        for voter in &voters {
            if election.voters.contains_key(voter) || !seen.insert(voter) {
                return Err(Error::AlreadyRegistered {
                    election_id,
                    voter: voter.clone(),
                });
            }
        }

        for (voter, hash) in voters.iter().zip(hashes) {
            election
                .voters
                .insert(voter.clone(), VoterRecord::new(hash, now));
        }
        info!(
            "{caller} registered {} voter(s) for election {election_id}",
            voters.len()
        );
        for voter in voters {
            self.emit(
                Action::VoterRegistered,
                caller,
                Some(election_id),
                Some(Subject::Account(voter)),
                now,
            );
        }
        Ok(())
    }

    /// Remove a voter who has not voted from an election that has not started.
    pub fn remove_voter(
        &mut self,
        caller: &AccountId,
        election_id: ElectionId,
        voter: &AccountId,
    ) -> Result<()> {
        self.authorize(caller, Capability::ManageElections)?;
        let now = self.now();
        let election = self.state.election_mut(election_id)?;
        let record = election.voter(voter).ok_or_else(|| Error::VoterNotFound {
            election_id,
            voter: voter.clone(),
        })?;
        if record.has_voted() {
            return Err(Error::VoterHasVoted {
                election_id,
                voter: voter.clone(),
            });
        }
        election.ensure_pending(now)?;

        election.voters.remove(voter);
        info!("{caller} removed voter {voter} from election {election_id}");
        self.emit(
            Action::VoterRemoved,
            caller,
            Some(election_id),
            Some(Subject::Account(voter.clone())),
            now,
        );
        Ok(())
    }

    /// Voting status of an account. Accounts that were never registered, or
    /// were removed, report the default all-false status.
    pub fn voter_status(&self, election_id: ElectionId, voter: &AccountId) -> Result<VoterStatus> {
        let election = self.state.election(election_id)?;
        Ok(election
            .voter(voter)
            .map(VoterRecord::status)
            .unwrap_or_default())
    }

    pub fn is_registered_voter(&self, election_id: ElectionId, voter: &AccountId) -> Result<bool> {
        Ok(self.voter_status(election_id, voter)?.is_registered)
    }

    /// Full registration details of a registered voter.
    pub fn voter_details(&self, election_id: ElectionId, voter: &AccountId) -> Result<VoterDetails> {
        let election = self.state.election(election_id)?;
        election
            .voter(voter)
            .map(|record| record.details(voter))
            .ok_or_else(|| Error::VoterNotFound {
                election_id,
                voter: voter.clone(),
            })
    }

    /// Number of voters currently registered for an election.
    pub fn registered_voter_count(&self, election_id: ElectionId) -> Result<u64> {
        Ok(self.state.election(election_id)?.voters.len() as u64)
    }

    /// Number of registered voters who have voted.
    pub fn voted_count(&self, election_id: ElectionId) -> Result<u64> {
        Ok(self.state.election(election_id)?.voted_count())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use crate::clock::ManualClock;
    use crate::error::ErrorKind;
    use crate::model::event::LedgerEvent;

    use super::*;

    fn voters_and_hashes(range: std::ops::RangeInclusive<u32>) -> (Vec<AccountId>, Vec<RegistrationHash>) {
        range
            .map(AccountId::voter_example)
            .map(|v| {
                let hash = RegistrationHash::example(&v);
                (v, hash)
            })
            .unzip()
    }

    #[ledger_test(seeded)]
    fn registration_is_create_once(ledger: &mut Ledger) {
        let admin = AccountId::admin_example();
        let voter = AccountId::voter_example(1);

        assert_eq!(ledger.registered_voter_count(0), Ok(2));
        assert!(ledger.is_registered_voter(0, &voter).unwrap());

        let other_hash = RegistrationHash::digest("a different commitment");
        assert_eq!(
            ledger.register_voter(&admin, 0, voter.clone(), other_hash),
            Err(Error::AlreadyRegistered {
                election_id: 0,
                voter: voter.clone()
            })
        );
        // The original commitment is untouched.
        assert_eq!(
            ledger.voter_details(0, &voter).unwrap().registration_hash,
            RegistrationHash::example(&voter)
        );
    }

    #[ledger_test(seeded)]
    fn batch_registers_all(ledger: &mut Ledger) {
        let admin = AccountId::admin_example();
        let (voters, hashes) = voters_and_hashes(3..=5);

        ledger
            .batch_register_voters(&admin, 0, voters.clone(), hashes)
            .unwrap();
        assert_eq!(ledger.registered_voter_count(0), Ok(5));
        for voter in &voters {
            assert!(ledger.is_registered_voter(0, voter).unwrap());
        }
        let now = ledger.now();
        let expected: Vec<_> = voters
            .into_iter()
            .map(|voter| LedgerEvent {
                action: Action::VoterRegistered,
                actor: admin.clone(),
                election_id: Some(0),
                subject: Some(Subject::Account(voter)),
                timestamp: now,
            })
            .collect();
        assert_eq!(ledger.events(), expected);
    }

    #[ledger_test(seeded)]
    fn batch_is_all_or_nothing(ledger: &mut Ledger) {
        let admin = AccountId::admin_example();

        // Voter 2 is already registered, so 3 and 4 must not be registered either.
        let (voters, hashes) = voters_and_hashes(2..=4);
        let err = ledger
            .batch_register_voters(&admin, 0, voters, hashes)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyRegistered);
        assert_eq!(ledger.registered_voter_count(0), Ok(2));
        assert!(!ledger
            .is_registered_voter(0, &AccountId::voter_example(3))
            .unwrap());

        // A voter repeated within the batch is rejected the same way.
        let (mut voters, mut hashes) = voters_and_hashes(3..=4);
        voters.push(AccountId::voter_example(3));
        hashes.push(RegistrationHash::example(&voters[0]));
        assert_eq!(
            ledger.batch_register_voters(&admin, 0, voters, hashes),
            Err(Error::AlreadyRegistered {
                election_id: 0,
                voter: AccountId::voter_example(3)
            })
        );

        // Mismatched lengths.
        let (voters, mut hashes) = voters_and_hashes(3..=4);
        hashes.pop();
        assert_eq!(
            ledger
                .batch_register_voters(&admin, 0, voters, hashes)
                .unwrap_err()
                .kind(),
            ErrorKind::InvalidInput
        );

        assert_eq!(ledger.registered_voter_count(0), Ok(2));
        assert!(ledger.events().is_empty());
    }

    #[ledger_test(seeded)]
    fn registration_closes_at_start(ledger: &mut Ledger, clock: ManualClock) {
        let admin = AccountId::admin_example();
        clock.advance(Duration::hours(1));

        let voter = AccountId::voter_example(3);
        let hash = RegistrationHash::example(&voter);
        assert_eq!(
            ledger.register_voter(&admin, 0, voter, hash),
            Err(Error::ElectionAlreadyStarted(0))
        );
        assert_eq!(
            ledger.remove_voter(&admin, 0, &AccountId::voter_example(1)),
            Err(Error::ElectionAlreadyStarted(0))
        );
        assert_eq!(ledger.registered_voter_count(0), Ok(2));
    }

    #[ledger_test(seeded)]
    fn remove_unvoted_voter(ledger: &mut Ledger) {
        let admin = AccountId::admin_example();
        let voter = AccountId::voter_example(2);

        ledger.remove_voter(&admin, 0, &voter).unwrap();
        assert_eq!(
            ledger.drain_events(),
            vec![LedgerEvent {
                action: Action::VoterRemoved,
                actor: admin.clone(),
                election_id: Some(0),
                subject: Some(Subject::Account(voter.clone())),
                timestamp: ledger.now(),
            }]
        );
        assert_eq!(ledger.voter_status(0, &voter), Ok(VoterStatus::default()));
        assert_eq!(ledger.registered_voter_count(0), Ok(1));
        assert_eq!(
            ledger.voter_details(0, &voter).unwrap_err().kind(),
            ErrorKind::NotFound
        );

        assert_eq!(
            ledger.remove_voter(&admin, 0, &voter),
            Err(Error::VoterNotFound {
                election_id: 0,
                voter: voter.clone()
            })
        );

        // Removed voters may be registered again before the start.
        let hash = RegistrationHash::example(&voter);
        ledger.register_voter(&admin, 0, voter.clone(), hash).unwrap();
        assert!(ledger.is_registered_voter(0, &voter).unwrap());
    }

    #[ledger_test(seeded)]
    fn voted_voters_stay(ledger: &mut Ledger, clock: ManualClock) {
        let admin = AccountId::admin_example();
        let voter = AccountId::voter_example(1);
        clock.advance(Duration::hours(2));
        ledger.cast_vote(&voter, 0, 0).unwrap();

        assert_eq!(
            ledger.remove_voter(&admin, 0, &voter),
            Err(Error::VoterHasVoted {
                election_id: 0,
                voter: voter.clone()
            })
        );
        let details = ledger.voter_details(0, &voter).unwrap();
        assert!(details.status.has_voted);
        assert_eq!(details.status.vote_timestamp, Some(ledger.now()));
    }

    #[ledger_test(seeded)]
    fn voter_management_requires_rights(ledger: &mut Ledger) {
        let outsider = AccountId::outsider_example();
        let hash = RegistrationHash::example(&outsider);

        let err = ledger
            .register_voter(&outsider, 0, outsider.clone(), hash)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        let err = ledger
            .remove_voter(&outsider, 0, &AccountId::voter_example(1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(ledger.registered_voter_count(0), Ok(2));
    }

    #[ledger_test]
    fn queries_on_unknown_election(ledger: &mut Ledger) {
        let voter = AccountId::voter_example(1);
        assert_eq!(ledger.voter_status(0, &voter), Err(Error::ElectionNotFound(0)));
        assert_eq!(ledger.registered_voter_count(0), Err(Error::ElectionNotFound(0)));
        assert_eq!(ledger.voted_count(0), Err(Error::ElectionNotFound(0)));
    }
}
