//! Treasury ledger.
//!
//! A single shared balance from which finalized proposals are paid. The
//! balance never goes negative and a disbursement either debits in full or
//! not at all.

use crate::error::GovernanceError;
use kalina_types::amount::checked_credit;
use kalina_types::{Address, Amount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Treasury balance and disbursement history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treasury {
    balance: Amount,
    /// Cumulative amount disbursed per recipient
    disbursed: BTreeMap<Address, Amount>,
}

impl Treasury {
    /// Create a treasury with an initial balance.
    pub fn new(initial_balance: Amount) -> Self {
        Self {
            balance: initial_balance,
            disbursed: BTreeMap::new(),
        }
    }

    /// Current balance.
    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Credit the treasury.
    pub fn deposit(&mut self, amount: Amount) -> Result<(), GovernanceError> {
        if amount == 0 {
            return Err(GovernanceError::InvalidAmount);
        }
        self.balance = checked_credit(self.balance, amount)
            .map_err(|_| GovernanceError::AmountOverflow)?;
        Ok(())
    }

    /// Debit `amount` in favor of `recipient`.
    pub fn disburse(&mut self, recipient: Address, amount: Amount) -> Result<(), GovernanceError> {
        if amount > self.balance {
            return Err(GovernanceError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }

        let received = self.disbursed.get(&recipient).copied().unwrap_or(0);
        let received = checked_credit(received, amount)
            .map_err(|_| GovernanceError::AmountOverflow)?;

        self.balance -= amount;
        self.disbursed.insert(recipient, received);
        Ok(())
    }

    /// Cumulative amount disbursed to a recipient.
    pub fn disbursed_to(&self, recipient: &Address) -> Amount {
        self.disbursed.get(recipient).copied().unwrap_or(0)
    }

    /// Cumulative amount disbursed to all recipients.
    pub fn total_disbursed(&self) -> Amount {
        self.disbursed.values().sum()
    }
}
