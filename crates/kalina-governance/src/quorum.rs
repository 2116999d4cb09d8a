//! Quorum policy.
//!
//! The threshold is an absolute "for"-vote count that a proposal must
//! STRICTLY exceed to become finalize-eligible. Against-votes are recorded
//! for display but never offset the quorum calculation.

use serde::{Deserialize, Serialize};

/// Quorum configuration for the whole ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumConfig {
    /// Minimum "for" vote count a proposal must exceed
    pub threshold: u64,
}

impl QuorumConfig {
    pub fn new(threshold: u64) -> Self {
        Self { threshold }
    }

    /// Check whether a for-vote tally clears the threshold.
    pub fn is_met(&self, votes_for: u64) -> bool {
        votes_for > self.threshold
    }
}

impl Default for QuorumConfig {
    fn default() -> Self {
        Self { threshold: 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_strict() {
        let quorum = QuorumConfig::new(3);
        assert!(!quorum.is_met(0));
        assert!(!quorum.is_met(3));
        assert!(quorum.is_met(4));
    }

    #[test]
    fn test_zero_threshold_needs_one_vote() {
        let quorum = QuorumConfig::new(0);
        assert!(!quorum.is_met(0));
        assert!(quorum.is_met(1));
    }
}
