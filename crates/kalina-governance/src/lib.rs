//! Kalina Governance - Quorum-gated treasury governance engine.
//!
//! This crate provides:
//! - Proposal ledger with a monotonic id sequence
//! - One-ballot-per-voter voting with live tallies
//! - Quorum evaluation and irreversible finalization
//! - Atomic treasury disbursement on finalize
//! - Read-only snapshot queries for external display layers

pub mod ballot;
pub mod engine;
pub mod error;
pub mod identity;
pub mod proposal;
pub mod query;
pub mod quorum;
pub mod treasury;

pub use ballot::{Ballot, VoteDirection};
pub use engine::{Dao, DaoConfig};
pub use error::GovernanceError;
pub use identity::{Credential, IdentityResolver};
pub use proposal::{Proposal, ProposalLedger, ProposalStatus};
pub use query::{DaoSnapshot, ProposalView, VoterStatus};
pub use quorum::QuorumConfig;
pub use treasury::Treasury;
