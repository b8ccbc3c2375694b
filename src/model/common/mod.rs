mod account;
pub mod election;

pub use account::AccountId;
pub use election::{CandidateIndex, ElectionId, ElectionPhase};
