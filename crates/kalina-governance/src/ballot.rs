//! Ballot records.
//!
//! A ballot is append-only: once recorded for a (voter, proposal) pair it is
//! never revoked or overwritten, in either direction.

use serde::{Deserialize, Serialize};

/// Direction of a single ballot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteDirection {
    /// Vote in favor
    For,
    /// Vote against
    Against,
}

impl VoteDirection {
    /// Check if this ballot counts toward the quorum tally.
    pub fn is_for(&self) -> bool {
        matches!(self, VoteDirection::For)
    }
}

/// A voter's recorded choice on a single proposal.
///
/// The (voter, proposal id) key lives in the proposal's ballot book, not in
/// the record itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    /// Direction of the vote
    pub direction: VoteDirection,
    /// Unix timestamp when the ballot was cast
    pub cast_at: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_is_for() {
        assert!(VoteDirection::For.is_for());
        assert!(!VoteDirection::Against.is_for());
    }

    #[test]
    fn test_ballot_serde_roundtrip() {
        let ballot = Ballot { direction: VoteDirection::Against, cast_at: 1_700_000_000 };
        let json = serde_json::to_string(&ballot).unwrap();
        let back: Ballot = serde_json::from_str(&json).unwrap();
        assert_eq!(ballot, back);
    }
}
