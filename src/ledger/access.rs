use log::{debug, info};

use crate::error::Result;
use crate::model::{
    access::Capability,
    common::AccountId,
    event::{Action, Subject},
};

use super::Ledger;

impl Ledger {
    pub fn is_admin(&self, account: &AccountId) -> bool {
        self.state.access.is_admin(account)
    }

    pub fn is_operator(&self, account: &AccountId) -> bool {
        self.state.access.is_operator(account)
    }

    pub fn admin(&self) -> &AccountId {
        self.state.access.admin()
    }

    pub fn operators(&self) -> Vec<AccountId> {
        self.state.access.operators().cloned().collect()
    }

    /// Delegate election management to `target`. Adding an existing operator does nothing.
    pub fn add_operator(&mut self, caller: &AccountId, target: AccountId) -> Result<()> {
        self.authorize(caller, Capability::ManageAccess)?;
        if !self.state.access.insert_operator(target.clone()) {
            debug!("{target} is already an operator");
            return Ok(());
        }
        info!("{caller} added operator {target}");
        let now = self.now();
        self.emit(
            Action::OperatorAdded,
            caller,
            None,
            Some(Subject::Account(target)),
            now,
        );
        Ok(())
    }

    /// Revoke `target`'s operator role. Removing a non-operator does nothing.
    pub fn remove_operator(&mut self, caller: &AccountId, target: &AccountId) -> Result<()> {
        self.authorize(caller, Capability::ManageAccess)?;
        if !self.state.access.remove_operator(target) {
            debug!("{target} is not an operator");
            return Ok(());
        }
        info!("{caller} removed operator {target}");
        let now = self.now();
        self.emit(
            Action::OperatorRemoved,
            caller,
            None,
            Some(Subject::Account(target.clone())),
            now,
        );
        Ok(())
    }

    /// Hand the admin role to `new_admin`. The caller loses it immediately.
    pub fn transfer_admin(&mut self, caller: &AccountId, new_admin: AccountId) -> Result<()> {
        self.authorize(caller, Capability::ManageAccess)?;
        info!("{caller} transferred admin to {new_admin}");
        self.state.access.set_admin(new_admin.clone());
        let now = self.now();
        self.emit(
            Action::AdminTransferred,
            caller,
            None,
            Some(Subject::Account(new_admin)),
            now,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{Error, ErrorKind};
    use crate::model::{election::ElectionSpec, event::LedgerEvent};

    use super::*;

    #[ledger_test]
    fn admin_manages_operators(ledger: &mut Ledger) {
        let admin = AccountId::admin_example();
        let operator = AccountId::operator_example();

        ledger.add_operator(&admin, operator.clone()).unwrap();
        assert!(ledger.is_operator(&operator));
        assert_eq!(ledger.operators(), vec![operator.clone()]);
        assert_eq!(
            ledger.events(),
            [LedgerEvent {
                action: Action::OperatorAdded,
                actor: admin.clone(),
                election_id: None,
                subject: Some(Subject::Account(operator.clone())),
                timestamp: ledger.now(),
            }]
        );

        // Operators can now create elections.
        ledger
            .create_election(&operator, ElectionSpec::starting_at(ledger.now()))
            .unwrap();

        ledger.remove_operator(&admin, &operator).unwrap();
        assert!(!ledger.is_operator(&operator));
        let err = ledger
            .create_election(&operator, ElectionSpec::starting_at(ledger.now()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);

        let actions: Vec<_> = ledger.drain_events().iter().map(|e| e.action).collect();
        assert_eq!(
            actions,
            vec![
                Action::OperatorAdded,
                Action::ElectionCreated,
                Action::OperatorRemoved
            ]
        );
    }

    #[ledger_test]
    fn repeated_changes_are_silent_no_ops(ledger: &mut Ledger) {
        let admin = AccountId::admin_example();
        let operator = AccountId::operator_example();

        ledger.add_operator(&admin, operator.clone()).unwrap();
        ledger.add_operator(&admin, operator.clone()).unwrap();
        ledger.remove_operator(&admin, &operator).unwrap();
        ledger.remove_operator(&admin, &operator).unwrap();

        assert_eq!(ledger.events().len(), 2);
    }

    #[ledger_test]
    fn only_admin_manages_access(ledger: &mut Ledger) {
        let admin = AccountId::admin_example();
        let operator = AccountId::operator_example();
        let outsider = AccountId::outsider_example();
        ledger.add_operator(&admin, operator.clone()).unwrap();
        ledger.drain_events();

        for caller in [&operator, &outsider] {
            let err = ledger.add_operator(caller, outsider.clone()).unwrap_err();
            assert_eq!(
                err,
                Error::Unauthorized {
                    caller: caller.clone(),
                    capability: Capability::ManageAccess,
                }
            );
            assert!(ledger.remove_operator(caller, &operator).is_err());
            assert!(ledger.transfer_admin(caller, caller.clone()).is_err());
        }

        // Nothing changed.
        assert!(ledger.is_admin(&admin));
        assert_eq!(ledger.operators(), vec![operator]);
        assert!(ledger.events().is_empty());
    }

    #[ledger_test]
    fn admin_transfer_moves_all_rights(ledger: &mut Ledger) {
        let admin = AccountId::admin_example();
        let successor = AccountId::operator_example();

        ledger.transfer_admin(&admin, successor.clone()).unwrap();
        assert_eq!(
            ledger.drain_events(),
            vec![LedgerEvent {
                action: Action::AdminTransferred,
                actor: admin.clone(),
                election_id: None,
                subject: Some(Subject::Account(successor.clone())),
                timestamp: ledger.now(),
            }]
        );
        assert!(ledger.is_admin(&successor));
        assert!(!ledger.is_admin(&admin));
        assert_eq!(ledger.admin(), &successor);

        assert!(ledger.add_operator(&admin, admin.clone()).is_err());
        ledger.add_operator(&successor, admin.clone()).unwrap();
        assert!(ledger.is_operator(&admin));
    }
}
