//! Chart-of-accounts classification.
//!
//! Accounts are grouped twice: by category/subcategory (a flat two-level
//! taxonomy also used for number prefixes) and by financial statement.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::accounts::error::AccountRuleError;

/// Top-level account class. Drives the 10-digit account number prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccountClass {
    /// Prefix 1000000000.
    Asset,
    /// Prefix 2000000000.
    Liability,
    /// Prefix 3000000000.
    Equity,
    /// Prefix 4000000000.
    Revenue,
    /// Prefix 5000000000.
    Expenses,
}

/// Subcategory-style names and the class they roll up to. Compared after
/// [`normalize_class_name`].
const CLASS_LOOKUP: &[(&str, AccountClass)] = &[
    ("asset", AccountClass::Asset),
    ("current asset", AccountClass::Asset),
    ("fixed asset", AccountClass::Asset),
    ("long-term asset", AccountClass::Asset),
    ("non-current asset", AccountClass::Asset),
    ("other asset", AccountClass::Asset),
    ("liability", AccountClass::Liability),
    ("current liability", AccountClass::Liability),
    ("long-term liability", AccountClass::Liability),
    ("other liability", AccountClass::Liability),
    ("equity", AccountClass::Equity),
    ("owner's equity", AccountClass::Equity),
    ("stockholders' equity", AccountClass::Equity),
    ("retained earning", AccountClass::Equity),
    ("revenue", AccountClass::Revenue),
    ("operating revenue", AccountClass::Revenue),
    ("other revenue", AccountClass::Revenue),
    ("expense", AccountClass::Expenses),
    ("operating expense", AccountClass::Expenses),
    ("other expense", AccountClass::Expenses),
    ("cost of goods sold", AccountClass::Expenses),
];

impl AccountClass {
    /// Maps a category or subcategory name to its class.
    ///
    /// # Errors
    ///
    /// Returns [`AccountRuleError::UnknownCategory`] for names outside the lookup table.
    pub fn from_category_name(name: &str) -> Result<Self, AccountRuleError> {
        let key = normalize_class_name(name);
        CLASS_LOOKUP
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, class)| *class)
            .ok_or_else(|| AccountRuleError::UnknownCategory(name.to_string()))
    }

    /// The 10-digit number prefix for accounts of this class.
    #[must_use]
    pub const fn prefix(self) -> i64 {
        match self {
            Self::Asset => 1_000_000_000,
            Self::Liability => 2_000_000_000,
            Self::Equity => 3_000_000_000,
            Self::Revenue => 4_000_000_000,
            Self::Expenses => 5_000_000_000,
        }
    }

    /// Leading digit shared by every account number of this class.
    #[must_use]
    pub const fn leading_digit(self) -> char {
        match self {
            Self::Asset => '1',
            Self::Liability => '2',
            Self::Equity => '3',
            Self::Revenue => '4',
            Self::Expenses => '5',
        }
    }

    /// Returns the canonical category name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "Asset",
            Self::Liability => "Liability",
            Self::Equity => "Equity",
            Self::Revenue => "Revenue",
            Self::Expenses => "Expenses",
        }
    }
}

impl fmt::Display for AccountClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Financial statement group used for report partitioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    /// Balance sheet, increases on DEBIT.
    Asset,
    /// Balance sheet, increases on CREDIT.
    Liability,
    /// Balance sheet, increases on CREDIT.
    Equity,
    /// Income statement, credits minus debits.
    Revenue,
    /// Income statement, reported as an absolute value.
    Expense,
}

impl StatementKind {
    /// Parses a statement table name ("Asset", "Assets", "expense", ...).
    pub fn parse(name: &str) -> Option<Self> {
        match normalize_class_name(name).as_str() {
            "asset" => Some(Self::Asset),
            "liability" => Some(Self::Liability),
            "equity" => Some(Self::Equity),
            "revenue" => Some(Self::Revenue),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Returns the canonical statement name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "Asset",
            Self::Liability => "Liability",
            Self::Equity => "Equity",
            Self::Revenue => "Revenue",
            Self::Expense => "Expense",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercases, trims and singularizes the last word so that "Current
/// Liabilities" and "current liability" compare equal.
#[must_use]
pub fn normalize_class_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    if let Some(stem) = lowered.strip_suffix("ies") {
        return format!("{stem}y");
    }
    match lowered.strip_suffix('s') {
        Some(stem) if !stem.ends_with('s') => stem.to_string(),
        _ => lowered,
    }
}

/// Returns true if `name` refers to the same class as `target`.
#[must_use]
pub fn same_class_name(name: &str, target: &str) -> bool {
    normalize_class_name(name) == normalize_class_name(target)
}
