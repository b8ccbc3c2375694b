use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::common::{AccountId, ElectionId, ElectionPhase};

/// A read-only election summary, safe to hand to any caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionView {
    pub id: ElectionId,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub creator: AccountId,
    /// False once the election has been closed manually.
    pub is_active: bool,
    pub results_finalized: bool,
    pub candidate_count: u32,
    pub total_votes: u64,
    /// The phase at the time the view was taken.
    pub phase: ElectionPhase,
}
