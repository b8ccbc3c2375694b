use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::common::{AccountId, CandidateIndex, ElectionId};

/// An auditable record of a committed structural change. These are the only
/// data the ledger pushes outward; the metadata store consumes them for its
/// activity log and statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEvent {
    pub action: Action,
    /// Who performed the change.
    pub actor: AccountId,
    /// The election affected, if the change was election-scoped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub election_id: Option<ElectionId>,
    /// The entity affected within the election, or the account affected by an access change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Subject>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    OperatorAdded,
    OperatorRemoved,
    AdminTransferred,
    ElectionCreated,
    ElectionUpdated,
    ElectionEnded,
    CandidateAdded,
    CandidateUpdated,
    VoterRegistered,
    VoterRemoved,
    VoteCast,
    ResultsFinalized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum Subject {
    Account(AccountId),
    Candidate(CandidateIndex),
}
