use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::common::CandidateIndex;

/// A single candidate. Its index is its position in the owning election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Candidate name; must not be blank.
    pub name: String,
    /// Free text, possibly empty.
    pub description: String,
    /// Votes received so far. Only ever incremented, and only by a cast vote.
    pub vote_count: u64,
}

impl Candidate {
    /// Create a candidate with no votes.
    pub fn new(name: String, description: String) -> Self {
        Self {
            name,
            description,
            vote_count: 0,
        }
    }

    /// Reject candidate names that are empty or whitespace.
    pub fn validate_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            Err(Error::InvalidInput("candidate name must not be empty".into()))
        } else {
            Ok(())
        }
    }

    pub fn view(&self, index: CandidateIndex) -> CandidateView {
        CandidateView {
            index,
            name: self.name.clone(),
            description: self.description.clone(),
            vote_count: self.vote_count,
        }
    }
}

/// A partial update to a candidate. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CandidateUpdate {
    pub fn validate(&self) -> Result<()> {
        match self.name {
            Some(ref name) => Candidate::validate_name(name),
            None => Ok(()),
        }
    }
}

/// A read-only candidate description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateView {
    pub index: CandidateIndex,
    pub name: String,
    pub description: String,
    pub vote_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_must_not_be_blank() {
        assert_eq!(Candidate::validate_name("Grace Hopper"), Ok(()));
        assert!(Candidate::validate_name("").is_err());
        assert!(Candidate::validate_name(" \t").is_err());

        let update = CandidateUpdate {
            name: Some(String::new()),
            description: None,
        };
        assert!(update.validate().is_err());
        assert_eq!(CandidateUpdate::default().validate(), Ok(()));
    }
}
