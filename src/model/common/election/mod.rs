mod phase;

pub use phase::ElectionPhase;

/// Our election IDs are sequential integers, starting from zero.
pub type ElectionId = u32;
/// Candidates are identified by their dense position within an election.
pub type CandidateIndex = u32;
