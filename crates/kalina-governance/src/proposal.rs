//! Proposal ledger and lifecycle.
//!
//! A proposal has exactly two states: Open -> Finalized, and the transition
//! is irreversible. Once finalized, tallies are frozen and no further
//! ballots are accepted.

use crate::ballot::{Ballot, VoteDirection};
use crate::error::GovernanceError;
use kalina_types::{Address, Amount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Proposal status in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalStatus {
    /// Accepting ballots, not yet disbursed
    Open,
    /// Tally frozen, funds disbursed
    Finalized,
}

impl ProposalStatus {
    /// Check if voting is still possible.
    pub fn can_vote(&self) -> bool {
        matches!(self, ProposalStatus::Open)
    }
}

/// A request to disburse treasury funds, subject to a vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Unique proposal ID, assigned sequentially from 1
    pub id: u64,
    /// Short title
    pub name: String,
    /// Free-text description, set once at creation
    pub description: String,
    /// Identity that created the proposal
    pub proposer: Address,
    /// Disbursement recipient, fixed at creation
    pub recipient: Address,
    /// Amount to disburse on finalize, in treasury base units
    pub amount: Amount,
    /// Count of "for" ballots
    pub votes_for: u64,
    /// Count of "against" ballots
    pub votes_against: u64,
    /// Monotonic false -> true
    pub finalized: bool,
    /// Unix timestamp of creation, immutable
    pub created_at: u64,
    /// Ballot book: voter -> ballot, append-only
    ballots: BTreeMap<Address, Ballot>,
}

impl Proposal {
    /// Create a new open proposal. Input validation is the ledger's job.
    pub fn new(
        id: u64,
        proposer: Address,
        name: String,
        description: String,
        recipient: Address,
        amount: Amount,
        created_at: u64,
    ) -> Self {
        Self {
            id,
            name,
            description,
            proposer,
            recipient,
            amount,
            votes_for: 0,
            votes_against: 0,
            finalized: false,
            created_at,
            ballots: BTreeMap::new(),
        }
    }

    /// Current lifecycle status.
    pub fn status(&self) -> ProposalStatus {
        if self.finalized {
            ProposalStatus::Finalized
        } else {
            ProposalStatus::Open
        }
    }

    /// Record a ballot and bump the matching tally.
    ///
    /// The ballot insert and the tally increment happen together under the
    /// ledger's writer lock; a concurrent duplicate sees both or neither.
    pub fn cast_vote(
        &mut self,
        voter: Address,
        direction: VoteDirection,
        cast_at: u64,
    ) -> Result<(), GovernanceError> {
        if self.finalized {
            return Err(GovernanceError::AlreadyFinalized(self.id));
        }

        if self.ballots.contains_key(&voter) {
            return Err(GovernanceError::DuplicateVote { voter, proposal: self.id });
        }

        match direction {
            VoteDirection::For => self.votes_for += 1,
            VoteDirection::Against => self.votes_against += 1,
        }
        self.ballots.insert(voter, Ballot { direction, cast_at });

        Ok(())
    }

    /// Check if a voter has a recorded ballot.
    pub fn has_voted(&self, voter: &Address) -> bool {
        self.ballots.contains_key(voter)
    }

    /// Get a voter's ballot, if any.
    pub fn ballot(&self, voter: &Address) -> Option<&Ballot> {
        self.ballots.get(voter)
    }

    /// Total ballots cast.
    pub fn total_votes(&self) -> u64 {
        self.votes_for + self.votes_against
    }

    /// Flip Open -> Finalized. Terminal; a second call is an error.
    pub fn mark_finalized(&mut self) -> Result<(), GovernanceError> {
        if self.finalized {
            return Err(GovernanceError::AlreadyFinalized(self.id));
        }
        self.finalized = true;
        Ok(())
    }
}

/// Ledger owning all proposals and the id sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalLedger {
    proposals: BTreeMap<u64, Proposal>,
    next_id: u64,
}

impl ProposalLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            proposals: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Create a new proposal with the next sequential id.
    pub fn create(
        &mut self,
        proposer: Address,
        name: String,
        description: String,
        recipient: Address,
        amount: Amount,
        created_at: u64,
    ) -> Result<u64, GovernanceError> {
        if amount == 0 {
            return Err(GovernanceError::InvalidAmount);
        }
        if recipient.is_zero() {
            return Err(GovernanceError::InvalidRecipient(
                "recipient must not be the zero address".to_string(),
            ));
        }

        let id = self.next_id;
        self.next_id += 1;

        let proposal = Proposal::new(id, proposer, name, description, recipient, amount, created_at);
        self.proposals.insert(id, proposal);

        Ok(id)
    }

    /// Get a proposal.
    pub fn get(&self, id: u64) -> Result<&Proposal, GovernanceError> {
        self.proposals.get(&id).ok_or(GovernanceError::NotFound(id))
    }

    /// Get a proposal mutably.
    pub fn get_mut(&mut self, id: u64) -> Result<&mut Proposal, GovernanceError> {
        self.proposals.get_mut(&id).ok_or(GovernanceError::NotFound(id))
    }

    /// All proposals by ascending id.
    pub fn iter(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.values()
    }

    /// Number of proposals ever created.
    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }
}
