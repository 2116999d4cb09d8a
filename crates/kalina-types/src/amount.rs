//! Treasury quantity unit.
//!
//! Amounts are denominated in the treasury's base unit (10^18 base units
//! per KLN, matching the chain the DAO disburses on).

use crate::error::TypesError;

/// Non-negative quantity in treasury base units.
pub type Amount = u128;

/// Base units per whole KLN.
pub const UNITS_PER_KLN: Amount = 1_000_000_000_000_000_000;

/// Add `amount` to `balance`, failing on overflow instead of wrapping.
pub fn checked_credit(balance: Amount, amount: Amount) -> Result<Amount, TypesError> {
    balance.checked_add(amount).ok_or(TypesError::AmountOverflow)
}
