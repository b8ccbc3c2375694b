use serde::{Deserialize, Serialize};

use crate::model::common::{CandidateIndex, ElectionId};

/// Tallies of an election that has ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionResults {
    pub election_id: ElectionId,
    /// One entry per candidate, in index order.
    pub tallies: Vec<CandidateTally>,
    pub total_votes: u64,
    /// Whether these tallies have been certified.
    pub finalized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateTally {
    pub index: CandidateIndex,
    pub name: String,
    pub vote_count: u64,
}

impl ElectionResults {
    /// The vote count for each candidate, in index order.
    pub fn counts(&self) -> Vec<u64> {
        self.tallies.iter().map(|t| t.vote_count).collect()
    }

    /// The indices of the candidates with the most votes. Ties yield every tied
    /// candidate; an election with no votes has no leaders.
    pub fn leaders(&self) -> Vec<CandidateIndex> {
        let top = match self.tallies.iter().map(|t| t.vote_count).max() {
            Some(top) if top > 0 => top,
            _ => return Vec::new(),
        };
        self.tallies
            .iter()
            .filter(|t| t.vote_count == top)
            .map(|t| t.index)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results(counts: &[u64]) -> ElectionResults {
        ElectionResults {
            election_id: 0,
            tallies: counts
                .iter()
                .enumerate()
                .map(|(i, &vote_count)| CandidateTally {
                    index: i as CandidateIndex,
                    name: format!("Candidate {i}"),
                    vote_count,
                })
                .collect(),
            total_votes: counts.iter().sum(),
            finalized: false,
        }
    }

    #[test]
    fn single_leader() {
        assert_eq!(results(&[2, 5, 1]).leaders(), vec![1]);
    }

    #[test]
    fn tied_leaders() {
        assert_eq!(results(&[3, 1, 3]).leaders(), vec![0, 2]);
    }

    #[test]
    fn no_votes_no_leaders() {
        assert!(results(&[0, 0]).leaders().is_empty());
        assert!(results(&[]).leaders().is_empty());
    }
}
