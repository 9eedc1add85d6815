//! Account lifecycle rules.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounts::error::AccountRuleError;
use crate::ledger::{EntryType, NormalSide};

/// The opening transaction synthesized for a new account with a starting balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedLine {
    /// Line type matching the account's normal side.
    pub entry_type: EntryType,
    /// Opening amount.
    pub amount: Decimal,
    /// Running balance after the seed (equal to the amount).
    pub balance: Decimal,
}

/// Validates the fields of a new account that need no lookups.
///
/// # Errors
///
/// Rejects a blank name or a negative opening balance.
pub fn validate_new_account(name: &str, initial_balance: Decimal) -> Result<(), AccountRuleError> {
    if name.trim().is_empty() {
        return Err(AccountRuleError::BlankName);
    }
    if initial_balance < Decimal::ZERO {
        return Err(AccountRuleError::NegativeInitialBalance(initial_balance));
    }
    Ok(())
}

/// Returns the seed line for an opening balance, or `None` when there is nothing to seed.
#[must_use]
pub fn seed_line(normal_side: NormalSide, initial_balance: Decimal) -> Option<SeedLine> {
    (initial_balance > Decimal::ZERO).then(|| SeedLine {
        entry_type: normal_side.increasing_entry(),
        amount: initial_balance,
        balance: initial_balance,
    })
}

/// An account may only be deactivated once its balance is zero.
///
/// # Errors
///
/// Returns [`AccountRuleError::NonZeroBalance`] otherwise.
pub fn ensure_can_deactivate(balance: Decimal) -> Result<(), AccountRuleError> {
    if balance.is_zero() {
        Ok(())
    } else {
        Err(AccountRuleError::NonZeroBalance(balance))
    }
}
