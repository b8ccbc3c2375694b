//! An election ledger: role-based management of time-windowed elections,
//! one-vote-per-voter ballots, and tallies that are released only once voting
//! has closed.

#[cfg(test)]
#[macro_use]
extern crate ledger_test;

pub mod clock;
pub mod config;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod model;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use ledger::{Ledger, LedgerState, SharedLedger};
