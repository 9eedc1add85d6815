//! Journal entry domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tally_shared::types::{AccountId, UserId};

use crate::ledger::EntryType;

/// Journal entry status.
///
/// The valid transitions are:
/// - Pending → Approved (approve, posts the lines)
/// - Pending → Rejected (reject, requires a comment)
///
/// Approved and Rejected are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JournalEntryStatus {
    /// Awaiting review.
    Pending,
    /// Approved and posted.
    Approved,
    /// Rejected with a comment.
    Rejected,
}

impl JournalEntryStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Parses a status from a string, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true once no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for JournalEntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Journal entry as submitted, before any validation.
///
/// Every field is optional so that a missing field is reported as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryDraft {
    /// Entry description.
    pub description: Option<String>,
    /// Entry date.
    pub date: Option<NaiveDate>,
    /// Adjusting entry flag.
    pub is_adjusting: Option<bool>,
    /// Creator.
    pub user_id: Option<i32>,
    /// Lines.
    pub transactions: Option<Vec<DraftLine>>,
}

/// One submitted line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftLine {
    /// Account id as sent by the client: a number or a numeric string.
    pub account_id: Option<serde_json::Value>,
    /// "DEBIT" or "CREDIT".
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
    /// Positive amount.
    pub amount: Option<Decimal>,
    /// Line description, defaults to the entry description.
    pub description: Option<String>,
    /// Line date, defaults to the entry date.
    pub date: Option<NaiveDate>,
}

/// A journal entry that passed input validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEntry {
    /// Trimmed description.
    pub description: String,
    /// Entry date.
    pub date: NaiveDate,
    /// Adjusting entry flag.
    pub is_adjusting: bool,
    /// Creator.
    pub created_by: UserId,
    /// Lines in submission order.
    pub lines: Vec<ValidatedLine>,
    /// Sum of debit and credit amounts (they are equal).
    pub total: Decimal,
}

impl ValidatedEntry {
    /// Distinct account ids referenced by the lines, in first-seen order.
    #[must_use]
    pub fn account_ids(&self) -> Vec<AccountId> {
        let mut ids: Vec<AccountId> = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            if !ids.contains(&line.account_id) {
                ids.push(line.account_id);
            }
        }
        ids
    }
}

/// One validated line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLine {
    /// Account to post to.
    pub account_id: AccountId,
    /// Debit or credit.
    pub entry_type: EntryType,
    /// Positive amount with at most two decimal places.
    pub amount: Decimal,
    /// Line description.
    pub description: String,
    /// Line date.
    pub date: NaiveDate,
}

/// What the account lookup knows about a referenced account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountAvailability {
    /// Exists and accepts postings.
    Active,
    /// Exists but is deactivated.
    Inactive,
    /// No such account.
    Missing,
}

/// Formats the human-readable entry number from its sequence value.
#[must_use]
pub fn format_pr(sequence: i64) -> String {
    format!("JE-{sequence:06}")
}

/// Notification text sent to managers for a new entry.
#[must_use]
pub fn approval_request_message(pr: &str) -> String {
    format!("Journal entry {pr} is awaiting your approval")
}
