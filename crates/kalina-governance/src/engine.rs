//! The governance engine.
//!
//! `Dao` ties the proposal ledger, treasury and quorum policy together
//! behind one writer lock, so a finalize's proposal flip and treasury debit
//! commit as a single transaction. Mutations run on a working copy of the
//! state and replace the live state only after validation and the snapshot
//! write both succeed; a failed operation leaves the live and on-disk state
//! untouched.

use crate::ballot::VoteDirection;
use crate::error::GovernanceError;
use crate::proposal::{Proposal, ProposalLedger};
use crate::query::{self, DaoSnapshot, VoterStatus};
use crate::quorum::QuorumConfig;
use crate::treasury::Treasury;
use kalina_store::SnapshotFile;
use kalina_types::{Address, Amount};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Initial parameters for a fresh ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaoConfig {
    /// Quorum policy
    pub quorum: QuorumConfig,
    /// Treasury funding at genesis
    pub initial_balance: Amount,
}

impl Default for DaoConfig {
    fn default() -> Self {
        Self {
            quorum: QuorumConfig::default(),
            initial_balance: 0,
        }
    }
}

/// Everything the engine persists, as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct DaoState {
    pub(crate) ledger: ProposalLedger,
    pub(crate) treasury: Treasury,
    pub(crate) quorum: QuorumConfig,
}

impl DaoState {
    fn genesis(config: &DaoConfig) -> Self {
        Self {
            ledger: ProposalLedger::new(),
            treasury: Treasury::new(config.initial_balance),
            quorum: config.quorum,
        }
    }
}

/// The governance engine. Safe to share across threads.
pub struct Dao {
    state: RwLock<DaoState>,
    store: Option<SnapshotFile<DaoState>>,
}

impl Dao {
    /// Create an engine with no persistence (tests, embedding).
    pub fn in_memory(config: DaoConfig) -> Self {
        Self {
            state: RwLock::new(DaoState::genesis(&config)),
            store: None,
        }
    }

    /// Open a persistent engine under `dir`.
    ///
    /// An existing snapshot wins over `config`; `config` only seeds a fresh
    /// data directory.
    pub fn open(config: DaoConfig, dir: &Path) -> Result<Self, GovernanceError> {
        let store = SnapshotFile::open(dir, "governance")?;

        let state = match store.load()? {
            Some(state) => state,
            None => {
                let state = DaoState::genesis(&config);
                store.save(&state)?;
                tracing::info!(
                    threshold = config.quorum.threshold,
                    initial_balance = config.initial_balance,
                    "initialized fresh governance ledger"
                );
                state
            }
        };

        Ok(Self {
            state: RwLock::new(state),
            store: Some(store),
        })
    }

    /// Check whether `dir` already holds a persisted ledger.
    ///
    /// Lets callers tell apart seeding a fresh ledger from reopening an
    /// existing one, where the snapshot wins over their config.
    pub fn ledger_exists(dir: &Path) -> bool {
        SnapshotFile::<DaoState>::exists(dir, "governance")
    }

    /// Run a mutation transactionally: validate against a working copy,
    /// persist the copy, then swap it in.
    fn commit<T>(
        &self,
        mutate: impl FnOnce(&mut DaoState) -> Result<T, GovernanceError>,
    ) -> Result<T, GovernanceError> {
        let mut guard = self.state.write();
        let mut next = guard.clone();

        let out = mutate(&mut next)?;

        if let Some(store) = &self.store {
            store.save(&next)?;
        }
        *guard = next;
        Ok(out)
    }

    // --- writes -----------------------------------------------------------

    /// Create a proposal. Any identity may propose.
    pub fn create_proposal(
        &self,
        proposer: Address,
        name: impl Into<String>,
        description: impl Into<String>,
        recipient: Address,
        amount: Amount,
    ) -> Result<u64, GovernanceError> {
        let name = name.into();
        let description = description.into();
        let created_at = unix_now();

        let id = self.commit(|state| {
            state
                .ledger
                .create(proposer, name, description, recipient, amount, created_at)
        })?;

        tracing::info!(id, %proposer, %recipient, amount, "proposal created");
        Ok(id)
    }

    /// Record a ballot for `voter` on proposal `id`.
    pub fn cast_vote(
        &self,
        voter: Address,
        id: u64,
        direction: VoteDirection,
    ) -> Result<(), GovernanceError> {
        let cast_at = unix_now();

        self.commit(|state| state.ledger.get_mut(id)?.cast_vote(voter, direction, cast_at))?;

        tracing::info!(id, %voter, ?direction, "vote recorded");
        Ok(())
    }

    /// Finalize an eligible proposal and disburse its amount.
    ///
    /// Check order: NotFound, AlreadyFinalized, QuorumNotMet,
    /// InsufficientFunds. Any failure leaves every entity as it was.
    pub fn finalize(&self, id: u64) -> Result<(), GovernanceError> {
        let (recipient, amount) = self.commit(|state| {
            let proposal = state.ledger.get(id)?;
            if proposal.finalized {
                return Err(GovernanceError::AlreadyFinalized(id));
            }
            if !state.quorum.is_met(proposal.votes_for) {
                return Err(GovernanceError::QuorumNotMet {
                    votes_for: proposal.votes_for,
                    threshold: state.quorum.threshold,
                });
            }

            let recipient = proposal.recipient;
            let amount = proposal.amount;

            state.treasury.disburse(recipient, amount)?;
            state.ledger.get_mut(id)?.mark_finalized()?;

            Ok((recipient, amount))
        })?;

        tracing::info!(id, %recipient, amount, "proposal finalized, funds disbursed");
        Ok(())
    }

    /// Credit the treasury.
    pub fn deposit(&self, amount: Amount) -> Result<(), GovernanceError> {
        self.commit(|state| state.treasury.deposit(amount))?;
        tracing::info!(amount, "treasury deposit");
        Ok(())
    }

    // --- reads ------------------------------------------------------------

    /// Check finalize eligibility: exists, open, and over quorum.
    pub fn is_eligible(&self, id: u64) -> bool {
        let state = self.state.read();
        match state.ledger.get(id) {
            Ok(p) => !p.finalized && state.quorum.is_met(p.votes_for),
            Err(_) => false,
        }
    }

    /// Check whether a voter has a ballot on a proposal.
    pub fn has_voted(&self, voter: Address, id: u64) -> Result<bool, GovernanceError> {
        let state = self.state.read();
        Ok(state.ledger.get(id)?.has_voted(&voter))
    }

    /// Get a proposal by id.
    pub fn proposal(&self, id: u64) -> Result<Proposal, GovernanceError> {
        let state = self.state.read();
        state.ledger.get(id).cloned()
    }

    /// All proposals by ascending id.
    pub fn proposals(&self) -> Vec<Proposal> {
        let state = self.state.read();
        state.ledger.iter().cloned().collect()
    }

    /// Current treasury balance.
    pub fn treasury_balance(&self) -> Amount {
        self.state.read().treasury.balance()
    }

    /// Cumulative amount disbursed to a recipient.
    pub fn disbursed_to(&self, recipient: Address) -> Amount {
        self.state.read().treasury.disbursed_to(&recipient)
    }

    /// Current quorum threshold.
    pub fn quorum_threshold(&self) -> u64 {
        self.state.read().quorum.threshold
    }

    /// One consistent snapshot for display layers.
    pub fn snapshot(&self) -> DaoSnapshot {
        let state = self.state.read();
        query::snapshot_of(&state)
    }

    /// A voter's ballots across all proposals, from one snapshot.
    pub fn voter_status(&self, voter: Address) -> VoterStatus {
        let state = self.state.read();
        query::voter_status_of(&state, voter)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::from_bytes([n; 20])
    }

    fn dao(threshold: u64, balance: Amount) -> Dao {
        Dao::in_memory(DaoConfig {
            quorum: QuorumConfig::new(threshold),
            initial_balance: balance,
        })
    }

    #[test]
    fn test_create_and_read_back() {
        let dao = dao(1, 100);
        let id = dao
            .create_proposal(addr(1), "Grants", "Fund the grants pool", addr(9), 10)
            .unwrap();

        let proposal = dao.proposal(id).unwrap();
        assert_eq!(proposal.name, "Grants");
        assert_eq!(proposal.amount, 10);
        assert!(!proposal.finalized);
        assert_eq!(dao.proposals().len(), 1);
    }

    #[test]
    fn test_vote_on_unknown_proposal() {
        let dao = dao(1, 100);
        let result = dao.cast_vote(addr(1), 7, VoteDirection::For);
        assert_eq!(result, Err(GovernanceError::NotFound(7)));
    }

    #[test]
    fn test_has_voted() {
        let dao = dao(1, 100);
        let id = dao.create_proposal(addr(1), "p", "", addr(9), 10).unwrap();

        assert!(!dao.has_voted(addr(2), id).unwrap());
        dao.cast_vote(addr(2), id, VoteDirection::For).unwrap();
        assert!(dao.has_voted(addr(2), id).unwrap());

        assert_eq!(dao.has_voted(addr(2), 99).err(), Some(GovernanceError::NotFound(99)));
    }

    #[test]
    fn test_eligibility_tracks_quorum() {
        let dao = dao(2, 100);
        let id = dao.create_proposal(addr(1), "p", "", addr(9), 10).unwrap();

        assert!(!dao.is_eligible(id));
        dao.cast_vote(addr(2), id, VoteDirection::For).unwrap();
        dao.cast_vote(addr(3), id, VoteDirection::For).unwrap();
        // Two for-votes do not strictly exceed a threshold of two.
        assert!(!dao.is_eligible(id));

        dao.cast_vote(addr(4), id, VoteDirection::For).unwrap();
        assert!(dao.is_eligible(id));

        // Against-votes never block eligibility.
        dao.cast_vote(addr(5), id, VoteDirection::Against).unwrap();
        assert!(dao.is_eligible(id));
    }

    #[test]
    fn test_is_eligible_unknown_is_false() {
        let dao = dao(1, 100);
        assert!(!dao.is_eligible(404));
    }

    #[test]
    fn test_finalize_before_quorum_fails_clean() {
        let dao = dao(3, 100);
        let id = dao.create_proposal(addr(1), "p", "", addr(9), 10).unwrap();
        dao.cast_vote(addr(2), id, VoteDirection::For).unwrap();

        let result = dao.finalize(id);
        assert_eq!(
            result,
            Err(GovernanceError::QuorumNotMet { votes_for: 1, threshold: 3 })
        );
        assert!(!dao.proposal(id).unwrap().finalized);
        assert_eq!(dao.treasury_balance(), 100);
    }

    #[test]
    fn test_finalize_insufficient_funds_fails_clean() {
        let dao = dao(0, 5);
        let id = dao.create_proposal(addr(1), "p", "", addr(9), 10).unwrap();
        dao.cast_vote(addr(2), id, VoteDirection::For).unwrap();

        let result = dao.finalize(id);
        assert_eq!(
            result,
            Err(GovernanceError::InsufficientFunds { requested: 10, available: 5 })
        );
        // No partial flip, no partial debit.
        assert!(!dao.proposal(id).unwrap().finalized);
        assert_eq!(dao.treasury_balance(), 5);
        assert_eq!(dao.disbursed_to(addr(9)), 0);
    }

    #[test]
    fn test_finalize_disburses_once() {
        let dao = dao(0, 100);
        let id = dao.create_proposal(addr(1), "p", "", addr(9), 10).unwrap();
        dao.cast_vote(addr(2), id, VoteDirection::For).unwrap();

        dao.finalize(id).unwrap();
        assert_eq!(dao.treasury_balance(), 90);
        assert_eq!(dao.disbursed_to(addr(9)), 10);
        assert!(dao.proposal(id).unwrap().finalized);

        assert_eq!(dao.finalize(id), Err(GovernanceError::AlreadyFinalized(id)));
        assert_eq!(dao.treasury_balance(), 90);
    }

    #[test]
    fn test_deposit_credits_balance() {
        let dao = dao(0, 10);
        dao.deposit(40).unwrap();
        assert_eq!(dao.treasury_balance(), 50);
    }

    #[test]
    fn test_failed_mutation_leaves_state_unchanged() {
        let dao = dao(0, 100);
        let id = dao.create_proposal(addr(1), "p", "", addr(9), 10).unwrap();
        dao.cast_vote(addr(2), id, VoteDirection::For).unwrap();

        let before = dao.snapshot();
        let _ = dao.cast_vote(addr(2), id, VoteDirection::Against);
        let after = dao.snapshot();

        assert_eq!(before.proposals, after.proposals);
        assert_eq!(before.treasury_balance, after.treasury_balance);
    }

    #[test]
    fn test_ledger_exists_after_open_seeds_snapshot() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(!Dao::ledger_exists(dir.path()));

        let _dao = Dao::open(DaoConfig::default(), dir.path()).unwrap();
        assert!(Dao::ledger_exists(dir.path()));
    }
}
