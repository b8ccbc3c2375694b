//! The election ledger: an owned store of elections plus the operations that
//! move it between states. Every mutating operation authorizes its caller,
//! validates everything it needs, and only then writes, so a rejected call
//! never leaves a partial change behind.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{
    access::{AccessControl, Capability, Role},
    common::{AccountId, ElectionId},
    election::Election,
    event::{Action, LedgerEvent, Subject},
};

pub use shared::SharedLedger;
pub use verify::VerificationError;

mod access;
mod finalizer;
mod registry;
mod roster;
mod shared;
mod verify;
mod voters;
mod voting;

/// Everything the ledger persists. This is also the snapshot format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    /// Admin and operators.
    pub access: AccessControl,
    /// All elections ever created. An election's ID is its position here.
    pub elections: Vec<Election>,
}

impl LedgerState {
    /// An empty ledger owned by `admin`.
    pub fn new(admin: AccountId) -> Self {
        Self {
            access: AccessControl::new(admin),
            elections: Vec::new(),
        }
    }

    pub fn election(&self, id: ElectionId) -> Result<&Election> {
        usize::try_from(id)
            .ok()
            .and_then(|i| self.elections.get(i))
            .ok_or(Error::ElectionNotFound(id))
    }

    fn election_mut(&mut self, id: ElectionId) -> Result<&mut Election> {
        usize::try_from(id)
            .ok()
            .and_then(|i| self.elections.get_mut(i))
            .ok_or(Error::ElectionNotFound(id))
    }
}

/// The election ledger.
pub struct Ledger {
    state: LedgerState,
    clock: Arc<dyn Clock>,
    min_duration: Duration,
    /// Events not yet collected by the metadata store.
    events: Vec<LedgerEvent>,
}

impl Ledger {
    /// Create an empty ledger owned by the configured admin.
    pub fn new(config: &Config, clock: impl Clock + 'static) -> Self {
        Self {
            state: LedgerState::new(config.admin().clone()),
            clock: Arc::new(clock),
            min_duration: config.min_duration(),
            events: Vec::new(),
        }
    }

    /// Rebuild a ledger from a snapshot, refusing snapshots that are not self-consistent.
    /// The snapshot's own role table wins over the configured admin. The configured
    /// minimum duration applies to elections created from now on.
    pub fn restore(
        state: LedgerState,
        config: &Config,
        clock: impl Clock + 'static,
    ) -> std::result::Result<Self, VerificationError> {
        state.verify()?;
        debug!(
            "Restored ledger with {} elections, admin {}",
            state.elections.len(),
            state.access.admin()
        );
        Ok(Self {
            state,
            clock: Arc::new(clock),
            min_duration: config.min_duration(),
            events: Vec::new(),
        })
    }

    /// A copy of the full ledger state, e.g. for dumping to disk.
    pub fn snapshot(&self) -> LedgerState {
        self.state.clone()
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn min_duration(&self) -> Duration {
        self.min_duration
    }

    /// The current time according to the ledger's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Events emitted since they were last drained, oldest first.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Hand over all pending events, leaving none behind.
    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Check the caller holds `capability`. Every mutating operation starts here.
    fn authorize(&self, caller: &AccountId, capability: Capability) -> Result<Role> {
        self.state
            .access
            .authorize(caller, capability)
            .map_err(|err| {
                warn!("Rejected: {err}");
                err
            })
    }

    fn emit(
        &mut self,
        action: Action,
        actor: &AccountId,
        election_id: Option<ElectionId>,
        subject: Option<Subject>,
        timestamp: DateTime<Utc>,
    ) {
        self.events.push(LedgerEvent {
            action,
            actor: actor.clone(),
            election_id,
            subject,
            timestamp,
        });
    }
}
