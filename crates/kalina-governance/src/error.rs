use kalina_types::{Address, Amount};
use thiserror::Error;

/// Errors that can occur in governance operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("Proposal not found: {0}")]
    NotFound(u64),

    #[error("Invalid amount: a proposal must request a positive amount")]
    InvalidAmount,

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Proposal {0} is already finalized")]
    AlreadyFinalized(u64),

    #[error("Voter {voter} has already voted on proposal {proposal}")]
    DuplicateVote { voter: Address, proposal: u64 },

    #[error("Quorum not met: {votes_for} for-votes, threshold {threshold}")]
    QuorumNotMet { votes_for: u64, threshold: u64 },

    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: Amount, available: Amount },

    #[error("Amount overflow")]
    AmountOverflow,

    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    #[error("Storage error: {0}")]
    Store(String),
}

impl From<kalina_store::StoreError> for GovernanceError {
    fn from(e: kalina_store::StoreError) -> Self {
        GovernanceError::Store(e.to_string())
    }
}
