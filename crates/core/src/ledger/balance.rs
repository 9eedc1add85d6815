//! Account balance calculations.
//!
//! Balances are stored unsigned relative to the account's normal side: a
//! Debit-normal account grows on DEBIT lines, a Credit-normal account grows on
//! CREDIT lines. Raw activity totals are kept separately and never signed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::entry::EntryType;

/// The side on which an account's balance naturally increases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NormalSide {
    /// Debit-normal (assets, expenses).
    Debit,
    /// Credit-normal (liabilities, equity, revenue).
    Credit,
}

impl NormalSide {
    /// Returns the string representation of the side.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "Debit",
            Self::Credit => "Credit",
        }
    }

    /// Parses a side, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "debit" => Some(Self::Debit),
            "credit" => Some(Self::Credit),
            _ => None,
        }
    }

    /// Signed balance change of one line on an account with this normal side.
    ///
    /// - Debit side: DEBIT adds, CREDIT subtracts
    /// - Credit side: CREDIT adds, DEBIT subtracts
    #[must_use]
    pub fn delta(self, entry_type: EntryType, amount: Decimal) -> Decimal {
        match (self, entry_type) {
            (Self::Debit, EntryType::Debit) | (Self::Credit, EntryType::Credit) => amount,
            (Self::Debit, EntryType::Credit) | (Self::Credit, EntryType::Debit) => -amount,
        }
    }

    /// The line type that increases an account on this side.
    #[must_use]
    pub const fn increasing_entry(self) -> EntryType {
        match self {
            Self::Debit => EntryType::Debit,
            Self::Credit => EntryType::Credit,
        }
    }
}

impl fmt::Display for NormalSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Balance state of one account: running balance plus raw activity totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// Normal side of the account.
    pub normal_side: NormalSide,
    /// Current balance relative to the normal side.
    pub balance: Decimal,
    /// Lifetime sum of DEBIT amounts.
    pub total_debits: Decimal,
    /// Lifetime sum of CREDIT amounts.
    pub total_credits: Decimal,
}

impl AccountBalance {
    /// Creates an empty balance.
    #[must_use]
    pub const fn new(normal_side: NormalSide) -> Self {
        Self {
            normal_side,
            balance: Decimal::ZERO,
            total_debits: Decimal::ZERO,
            total_credits: Decimal::ZERO,
        }
    }

    /// Applies one line and returns the balance immediately after it.
    pub fn apply(&mut self, entry_type: EntryType, amount: Decimal) -> Decimal {
        self.balance += self.normal_side.delta(entry_type, amount);
        match entry_type {
            EntryType::Debit => self.total_debits += amount,
            EntryType::Credit => self.total_credits += amount,
        }
        self.balance
    }
}
