//! Rules for editing an individual transaction line.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tally_shared::types::TransactionId;

use crate::journal::error::JournalError;
use crate::journal::types::JournalEntryStatus;
use crate::journal::validation::ensure_valid_amount;

/// Requested changes to one transaction.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEdit {
    /// New description.
    pub description: Option<String>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New ledger date.
    pub date: Option<NaiveDate>,
}

impl TransactionEdit {
    /// True when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.amount.is_none() && self.date.is_none()
    }
}

/// How an accepted edit must be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPlan {
    /// Row is not posted yet: write the fields in place. When the amount
    /// changed on a line of a pending entry the caller re-checks the entry
    /// balance before writing.
    InPlace {
        /// Whether the entry balance must be re-checked.
        recheck_balance: bool,
    },
    /// Row is posted: write the fields then replay the account's running
    /// balance chain.
    Replay {
        /// Earliest ledger date the edit touches.
        from_date: NaiveDate,
    },
}

/// The stored state of the transaction being edited.
#[derive(Debug, Clone, Copy)]
pub struct EditTarget {
    /// Transaction row.
    pub transaction_id: TransactionId,
    /// Whether the row has been posted.
    pub is_approved: bool,
    /// Current ledger date.
    pub date: NaiveDate,
    /// Status of the owning entry, if any.
    pub entry_status: Option<JournalEntryStatus>,
}

/// Decides how to apply `edit` to `target`.
///
/// # Errors
///
/// Rejects empty edits, invalid amounts and edits to lines of rejected entries.
pub fn plan_edit(target: &EditTarget, edit: &TransactionEdit) -> Result<EditPlan, JournalError> {
    if edit.is_empty() {
        return Err(JournalError::EmptyEdit);
    }
    if let Some(amount) = edit.amount {
        ensure_valid_amount(amount)?;
    }
    if target.entry_status == Some(JournalEntryStatus::Rejected) {
        return Err(JournalError::TransactionClosed(target.transaction_id));
    }
    if target.is_approved {
        let from_date = edit.date.map_or(target.date, |d| d.min(target.date));
        return Ok(EditPlan::Replay { from_date });
    }
    Ok(EditPlan::InPlace {
        recheck_balance: edit.amount.is_some() && target.entry_status.is_some(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, day).unwrap()
    }

    fn target(is_approved: bool, status: Option<JournalEntryStatus>) -> EditTarget {
        EditTarget {
            transaction_id: TransactionId::new(10),
            is_approved,
            date: date(15),
            entry_status: status,
        }
    }

    #[test]
    fn test_empty_edit_rejected() {
        let t = target(false, Some(JournalEntryStatus::Pending));
        assert!(matches!(
            plan_edit(&t, &TransactionEdit::default()),
            Err(JournalError::EmptyEdit)
        ));
    }

    #[test]
    fn test_posted_edit_replays_from_earlier_date() {
        let t = target(true, Some(JournalEntryStatus::Approved));
        let edit = TransactionEdit {
            date: Some(date(3)),
            ..Default::default()
        };
        assert_eq!(
            plan_edit(&t, &edit).unwrap(),
            EditPlan::Replay { from_date: date(3) }
        );

        let edit = TransactionEdit {
            date: Some(date(20)),
            ..Default::default()
        };
        assert_eq!(
            plan_edit(&t, &edit).unwrap(),
            EditPlan::Replay { from_date: date(15) }
        );
    }

    #[test]
    fn test_pending_amount_edit_rechecks_balance() {
        let t = target(false, Some(JournalEntryStatus::Pending));
        let edit = TransactionEdit {
            amount: Some(dec!(25)),
            ..Default::default()
        };
        assert_eq!(
            plan_edit(&t, &edit).unwrap(),
            EditPlan::InPlace {
                recheck_balance: true
            }
        );

        let edit = TransactionEdit {
            description: Some("typo".into()),
            ..Default::default()
        };
        assert_eq!(
            plan_edit(&t, &edit).unwrap(),
            EditPlan::InPlace {
                recheck_balance: false
            }
        );
    }

    #[test]
    fn test_rejected_entry_lines_are_closed() {
        let t = target(false, Some(JournalEntryStatus::Rejected));
        let edit = TransactionEdit {
            description: Some("x".into()),
            ..Default::default()
        };
        assert!(matches!(
            plan_edit(&t, &edit),
            Err(JournalError::TransactionClosed(_))
        ));
    }

    #[test]
    fn test_invalid_amount_rejected() {
        let t = target(true, None);
        let edit = TransactionEdit {
            amount: Some(dec!(-5)),
            ..Default::default()
        };
        assert!(matches!(plan_edit(&t, &edit), Err(JournalError::InvalidAmount(_))));
    }
}
