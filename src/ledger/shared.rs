use std::sync::{Arc, PoisonError, RwLock};

use crate::error::Result;
use crate::model::common::{AccountId, CandidateIndex, ElectionId};

use super::{Ledger, LedgerState};

/// A ledger shared between threads. Writers hold the lock across the whole
/// check-then-write sequence of an operation, so concurrent operations behave
/// as if they ran one after another.
///
/// Ledger operations never panic between validating and writing, so a lock
/// poisoned by a panicking caller still guards consistent state and is reused.
#[derive(Clone)]
pub struct SharedLedger {
    inner: Arc<RwLock<Ledger>>,
}

impl SharedLedger {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    /// Run a read-only operation. Any number of readers may run at once.
    pub fn read<T>(&self, f: impl FnOnce(&Ledger) -> T) -> T {
        let ledger = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&ledger)
    }

    /// Run a mutating operation with exclusive access.
    pub fn write<T>(&self, f: impl FnOnce(&mut Ledger) -> T) -> T {
        let mut ledger = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut ledger)
    }

    pub fn cast_vote(
        &self,
        caller: &AccountId,
        election_id: ElectionId,
        candidate: CandidateIndex,
    ) -> Result<()> {
        self.write(|ledger| ledger.cast_vote(caller, election_id, candidate))
    }

    pub fn snapshot(&self) -> LedgerState {
        self.read(Ledger::snapshot)
    }
}
