//! Read-only projections for external display layers.
//!
//! Every view is built under one read guard, so a snapshot never mixes
//! pre- and post-finalize state of the same proposal.

use crate::ballot::VoteDirection;
use crate::engine::DaoState;
use kalina_types::{Address, Amount};
use serde::Serialize;

/// One consistent view of the whole ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaoSnapshot {
    /// Quorum threshold in force
    pub quorum_threshold: u64,
    /// Treasury balance at snapshot time
    pub treasury_balance: Amount,
    /// All proposals by ascending id, with live tallies
    pub proposals: Vec<ProposalView>,
}

/// A proposal as external callers see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProposalView {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub proposer: Address,
    pub recipient: Address,
    pub amount: Amount,
    pub votes_for: u64,
    pub votes_against: u64,
    pub total_votes: u64,
    pub status: crate::proposal::ProposalStatus,
    /// Whether finalize would clear the quorum gate right now
    pub eligible: bool,
    pub created_at: u64,
    /// Cumulative amount the recipient has received from the treasury
    pub recipient_received: Amount,
}

/// A single voter's ballots across all proposals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoterStatus {
    pub voter: Address,
    pub ballots: Vec<VoterBallot>,
}

/// One entry of a voter's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoterBallot {
    pub proposal: u64,
    pub direction: VoteDirection,
    pub cast_at: u64,
}

pub(crate) fn snapshot_of(state: &DaoState) -> DaoSnapshot {
    let proposals = state
        .ledger
        .iter()
        .map(|p| ProposalView {
            id: p.id,
            name: p.name.clone(),
            description: p.description.clone(),
            proposer: p.proposer,
            recipient: p.recipient,
            amount: p.amount,
            votes_for: p.votes_for,
            votes_against: p.votes_against,
            total_votes: p.total_votes(),
            status: p.status(),
            eligible: !p.finalized && state.quorum.is_met(p.votes_for),
            created_at: p.created_at,
            recipient_received: state.treasury.disbursed_to(&p.recipient),
        })
        .collect();

    DaoSnapshot {
        quorum_threshold: state.quorum.threshold,
        treasury_balance: state.treasury.balance(),
        proposals,
    }
}

pub(crate) fn voter_status_of(state: &DaoState, voter: Address) -> VoterStatus {
    let ballots = state
        .ledger
        .iter()
        .filter_map(|p| {
            p.ballot(&voter).map(|b| VoterBallot {
                proposal: p.id,
                direction: b.direction,
                cast_at: b.cast_at,
            })
        })
        .collect();

    VoterStatus { voter, ballots }
}
