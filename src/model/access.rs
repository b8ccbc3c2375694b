use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::common::AccountId;

/// The ledger's role table: a single admin plus any number of delegated operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    /// The owner of the ledger.
    admin: AccountId,
    /// Accounts the admin has delegated election management to.
    operators: BTreeSet<AccountId>,
}

/// The role an authorized caller acted under.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Operator,
}

/// Things a caller may ask to do.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Capability {
    /// Add or remove operators, or hand over the admin role. Admin only.
    ManageAccess,
    /// Create and manage elections, candidates and voters. Admin or operator.
    ManageElections,
}

impl Display for Capability {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ManageAccess => write!(f, "manage operators or the admin"),
            Self::ManageElections => write!(f, "manage elections"),
        }
    }
}

impl AccessControl {
    /// Create a role table owned by `admin`, with no operators.
    pub fn new(admin: AccountId) -> Self {
        Self {
            admin,
            operators: BTreeSet::new(),
        }
    }

    pub fn admin(&self) -> &AccountId {
        &self.admin
    }

    pub fn operators(&self) -> impl Iterator<Item = &AccountId> {
        self.operators.iter()
    }

    pub fn is_admin(&self, account: &AccountId) -> bool {
        &self.admin == account
    }

    pub fn is_operator(&self, account: &AccountId) -> bool {
        self.operators.contains(account)
    }

    /// The role held by the given account, if any. Admin takes precedence.
    pub fn role_of(&self, account: &AccountId) -> Option<Role> {
        if self.is_admin(account) {
            Some(Role::Admin)
        } else if self.is_operator(account) {
            Some(Role::Operator)
        } else {
            None
        }
    }

    /// Decide whether `caller` holds `capability`, returning the role that grants it.
    pub fn authorize(&self, caller: &AccountId, capability: Capability) -> Result<Role> {
        match (capability, self.role_of(caller)) {
            (Capability::ManageAccess, Some(Role::Admin)) => Ok(Role::Admin),
            (Capability::ManageElections, Some(role)) => Ok(role),
            _ => Err(Error::Unauthorized {
                caller: caller.clone(),
                capability,
            }),
        }
    }

    /// Returns false if the account was already an operator.
    pub(crate) fn insert_operator(&mut self, account: AccountId) -> bool {
        self.operators.insert(account)
    }

    /// Returns false if the account was not an operator.
    pub(crate) fn remove_operator(&mut self, account: &AccountId) -> bool {
        self.operators.remove(account)
    }

    pub(crate) fn set_admin(&mut self, account: AccountId) {
        self.admin = account;
    }
}
