//! End-to-end tests for the governance engine.
//!
//! Covers the full proposal lifecycle, concurrency behavior, and
//! persistence across a restart.

use kalina_governance::{Dao, DaoConfig, GovernanceError, QuorumConfig, VoteDirection};
use kalina_types::Address;
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

fn addr(n: u8) -> Address {
    Address::from_bytes([n; 20])
}

fn dao(threshold: u64, balance: u128) -> Dao {
    Dao::in_memory(DaoConfig {
        quorum: QuorumConfig::new(threshold),
        initial_balance: balance,
    })
}

#[test]
fn test_full_lifecycle_with_quorum_three() {
    // Threshold 3, proposal amount 10, treasury 100.
    let dao = dao(3, 100);
    let p1 = dao
        .create_proposal(addr(1), "Grant", "Fund the builders", addr(9), 10)
        .unwrap();

    // Four distinct voters vote for; eligibility flips on the 4th vote.
    for n in 2..=4 {
        dao.cast_vote(addr(n), p1, VoteDirection::For).unwrap();
        assert!(!dao.is_eligible(p1));
    }
    dao.cast_vote(addr(5), p1, VoteDirection::For).unwrap();
    assert!(dao.is_eligible(p1));

    dao.finalize(p1).unwrap();
    assert_eq!(dao.treasury_balance(), 90);
    assert!(dao.proposal(p1).unwrap().finalized);

    // A 5th voter is now rejected with AlreadyFinalized.
    assert_eq!(
        dao.cast_vote(addr(6), p1, VoteDirection::For),
        Err(GovernanceError::AlreadyFinalized(p1))
    );
}

#[test]
fn test_underfunded_proposal_cannot_finalize() {
    let dao = dao(3, 100);

    // Drain the treasury down to 90 via a first proposal.
    let p1 = dao.create_proposal(addr(1), "p1", "", addr(9), 10).unwrap();
    for n in 2..=5 {
        dao.cast_vote(addr(n), p1, VoteDirection::For).unwrap();
    }
    dao.finalize(p1).unwrap();
    assert_eq!(dao.treasury_balance(), 90);

    // p2 asks for 200; quorum is met but funds are not there.
    let p2 = dao.create_proposal(addr(1), "p2", "", addr(8), 200).unwrap();
    for n in 2..=5 {
        dao.cast_vote(addr(n), p2, VoteDirection::For).unwrap();
    }
    assert!(dao.is_eligible(p2));

    assert_eq!(
        dao.finalize(p2),
        Err(GovernanceError::InsufficientFunds { requested: 200, available: 90 })
    );
    assert_eq!(dao.treasury_balance(), 90);
    assert!(!dao.proposal(p2).unwrap().finalized);
}

#[test]
fn test_concurrent_distinct_voters_all_land() {
    let dao = Arc::new(dao(100, 0));
    let id = dao.create_proposal(addr(1), "p", "", addr(9), 10).unwrap();

    let n_voters = 32u8;
    let handles: Vec<_> = (1..=n_voters)
        .map(|n| {
            let dao = Arc::clone(&dao);
            thread::spawn(move || {
                let direction = if n % 3 == 0 { VoteDirection::Against } else { VoteDirection::For };
                dao.cast_vote(Address::from_bytes([n.wrapping_add(100); 20]), id, direction)
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    let proposal = dao.proposal(id).unwrap();
    assert_eq!(proposal.total_votes(), n_voters as u64);
    assert_eq!(proposal.votes_for + proposal.votes_against, n_voters as u64);
}

#[test]
fn test_concurrent_duplicate_voter_lands_once() {
    let dao = Arc::new(dao(100, 0));
    let id = dao.create_proposal(addr(1), "p", "", addr(9), 10).unwrap();
    let voter = addr(42);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let dao = Arc::clone(&dao);
            thread::spawn(move || dao.cast_vote(voter, id, VoteDirection::For))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let successes = results.iter().filter(|r| r.is_ok()).count();

    assert_eq!(successes, 1);
    assert_eq!(dao.proposal(id).unwrap().total_votes(), 1);
}

#[test]
fn test_concurrent_finalize_debits_once() {
    let dao = Arc::new(dao(0, 100));
    let id = dao.create_proposal(addr(1), "p", "", addr(9), 10).unwrap();
    dao.cast_vote(addr(2), id, VoteDirection::For).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let dao = Arc::clone(&dao);
            thread::spawn(move || dao.finalize(id))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let successes = results.iter().filter(|r| r.is_ok()).count();

    assert_eq!(successes, 1);
    assert_eq!(dao.treasury_balance(), 90);
}

#[test]
fn test_state_survives_restart() {
    let dir = TempDir::new().unwrap();
    let config = DaoConfig {
        quorum: QuorumConfig::new(2),
        initial_balance: 500,
    };

    let id = {
        let dao = Dao::open(config.clone(), dir.path()).unwrap();
        let id = dao.create_proposal(addr(1), "Grant", "desc", addr(9), 100).unwrap();
        dao.cast_vote(addr(2), id, VoteDirection::For).unwrap();
        dao.cast_vote(addr(3), id, VoteDirection::Against).unwrap();
        id
    };

    // Reopen with a different config: the snapshot wins.
    let reopened = Dao::open(
        DaoConfig { quorum: QuorumConfig::new(99), initial_balance: 0 },
        dir.path(),
    )
    .unwrap();

    assert_eq!(reopened.quorum_threshold(), 2);
    assert_eq!(reopened.treasury_balance(), 500);
    let proposal = reopened.proposal(id).unwrap();
    assert_eq!(proposal.votes_for, 1);
    assert_eq!(proposal.votes_against, 1);
    assert!(reopened.has_voted(addr(2), id).unwrap());
    assert!(!reopened.has_voted(addr(4), id).unwrap());
}

#[test]
fn test_finalize_persists_across_restart() {
    let dir = TempDir::new().unwrap();
    let config = DaoConfig {
        quorum: QuorumConfig::new(0),
        initial_balance: 100,
    };

    let id = {
        let dao = Dao::open(config.clone(), dir.path()).unwrap();
        let id = dao.create_proposal(addr(1), "p", "", addr(9), 40).unwrap();
        dao.cast_vote(addr(2), id, VoteDirection::For).unwrap();
        dao.finalize(id).unwrap();
        id
    };

    let reopened = Dao::open(config, dir.path()).unwrap();
    assert_eq!(reopened.treasury_balance(), 60);
    assert!(reopened.proposal(id).unwrap().finalized);
    assert_eq!(reopened.disbursed_to(addr(9)), 40);

    // Still terminal after the restart.
    assert_eq!(reopened.finalize(id), Err(GovernanceError::AlreadyFinalized(id)));
}

proptest! {
    /// For any vote sequence, tallies always sum to the number of distinct
    /// voters whose ballots were accepted.
    #[test]
    fn prop_tallies_match_ballot_count(votes in prop::collection::vec((1u8..=60, any::<bool>()), 0..80)) {
        let dao = dao(1_000, 0);
        let id = dao.create_proposal(addr(255), "p", "", addr(254), 10).unwrap();

        let mut seen = HashSet::new();
        for (n, in_favor) in votes {
            let direction = if in_favor { VoteDirection::For } else { VoteDirection::Against };
            let result = dao.cast_vote(addr(n), id, direction);
            if seen.insert(n) {
                prop_assert!(result.is_ok());
            } else {
                prop_assert_eq!(result, Err(GovernanceError::DuplicateVote { voter: addr(n), proposal: id }));
            }
        }

        let proposal = dao.proposal(id).unwrap();
        prop_assert_eq!(proposal.votes_for + proposal.votes_against, seen.len() as u64);
        prop_assert_eq!(proposal.total_votes(), seen.len() as u64);
    }
}
