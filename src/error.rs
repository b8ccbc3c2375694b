use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::model::{
    access::Capability,
    common::{AccountId, CandidateIndex, ElectionId},
};

pub type Result<T> = std::result::Result<T, Error>;

/// A rejected ledger operation. Every variant leaves the ledger untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Unauthorized: {caller} may not {capability}")]
    Unauthorized {
        caller: AccountId,
        capability: Capability,
    },
    #[error("Not found: election {0}")]
    ElectionNotFound(ElectionId),
    #[error("Not found: voter {voter} in election {election_id}")]
    VoterNotFound {
        election_id: ElectionId,
        voter: AccountId,
    },
    #[error("Invalid time window: {0}")]
    InvalidTimeWindow(WindowError),
    #[error("Election {0} has already started")]
    ElectionAlreadyStarted(ElectionId),
    #[error("Election {0} has not started yet")]
    ElectionNotStarted(ElectionId),
    #[error("Election {0} is still active")]
    ElectionStillActive(ElectionId),
    #[error("Election {0} has ended")]
    ElectionEnded(ElectionId),
    #[error("Voter {voter} is not registered for election {election_id}")]
    VoterNotRegistered {
        election_id: ElectionId,
        voter: AccountId,
    },
    #[error("Voter {voter} is already registered for election {election_id}")]
    AlreadyRegistered {
        election_id: ElectionId,
        voter: AccountId,
    },
    #[error("Voter {voter} has already voted in election {election_id}")]
    AlreadyVoted {
        election_id: ElectionId,
        voter: AccountId,
    },
    #[error("Voter {voter} has voted in election {election_id} and cannot be removed")]
    VoterHasVoted {
        election_id: ElectionId,
        voter: AccountId,
    },
    #[error("Candidate {index} not found in election {election_id}")]
    CandidateNotFound {
        election_id: ElectionId,
        index: CandidateIndex,
    },
    #[error("Results for election {0} are not available until it ends")]
    ResultsNotAvailable(ElectionId),
    #[error("Results for election {0} are already finalized")]
    AlreadyFinalized(ElectionId),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// The coarse category of this error, without the identifiers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::ElectionNotFound(_) | Self::VoterNotFound { .. } => ErrorKind::NotFound,
            Self::InvalidTimeWindow(_) => ErrorKind::InvalidTimeWindow,
            Self::ElectionAlreadyStarted(_) => ErrorKind::ElectionAlreadyStarted,
            Self::ElectionNotStarted(_) => ErrorKind::ElectionNotStarted,
            Self::ElectionStillActive(_) => ErrorKind::ElectionStillActive,
            Self::ElectionEnded(_) => ErrorKind::ElectionEnded,
            Self::VoterNotRegistered { .. } => ErrorKind::VoterNotRegistered,
            Self::AlreadyRegistered { .. } => ErrorKind::AlreadyRegistered,
            Self::AlreadyVoted { .. } => ErrorKind::AlreadyVoted,
            Self::VoterHasVoted { .. } => ErrorKind::VoterHasVoted,
            Self::CandidateNotFound { .. } => ErrorKind::CandidateNotFound,
            Self::ResultsNotAvailable(_) => ErrorKind::ResultsNotAvailable,
            Self::AlreadyFinalized(_) => ErrorKind::AlreadyFinalized,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }
}

/// Error categories, suitable for mapping onto user-facing messages or status codes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthorized,
    NotFound,
    InvalidTimeWindow,
    ElectionAlreadyStarted,
    ElectionNotStarted,
    ElectionStillActive,
    ElectionEnded,
    VoterNotRegistered,
    AlreadyRegistered,
    AlreadyVoted,
    VoterHasVoted,
    CandidateNotFound,
    ResultsNotAvailable,
    AlreadyFinalized,
    InvalidInput,
}

/// Ways in which a proposed election window can be malformed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WindowError {
    /// The start time is not strictly in the future.
    StartNotInFuture,
    /// The end time does not come after the start time.
    EndNotAfterStart,
    /// The window is shorter than the configured minimum, in seconds.
    TooShort { minimum_seconds: i64 },
}

impl Display for WindowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StartNotInFuture => write!(f, "start time must be in the future"),
            Self::EndNotAfterStart => write!(f, "end time must be after start time"),
            Self::TooShort { minimum_seconds } => {
                write!(f, "election must last at least {minimum_seconds} seconds")
            }
        }
    }
}
