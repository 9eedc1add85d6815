//! Journal entry error types.

use rust_decimal::Decimal;
use tally_shared::AppError;
use tally_shared::types::{AccountId, JournalEntryId, TransactionId};
use thiserror::Error;

use crate::journal::types::JournalEntryStatus;

/// Errors raised while creating, reviewing or editing journal entries.
#[derive(Debug, Error)]
pub enum JournalError {
    /// One or more required fields are absent.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// The transactions list is empty.
    #[error("Journal entry must contain at least one transaction")]
    EmptyTransactions,

    /// An account id could not be read as an integer.
    #[error("Invalid account id: {0}")]
    InvalidAccountId(String),

    /// A line type is neither DEBIT nor CREDIT.
    #[error("Invalid transaction type: {0}")]
    InvalidEntryType(String),

    /// Amount is not positive or has more than two decimal places.
    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),

    /// Debits and credits differ.
    #[error("Debits ({debit_total}) must equal credits ({credit_total})")]
    Unbalanced {
        /// Sum of debit lines.
        debit_total: Decimal,
        /// Sum of credit lines.
        credit_total: Decimal,
    },

    /// Referenced accounts do not exist or are inactive.
    #[error("Invalid or inactive accounts: {}", format_ids(.0))]
    InvalidAccounts(Vec<AccountId>),

    /// The entry is not in a state that allows the transition.
    #[error("Cannot move journal entry from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: JournalEntryStatus,
        /// Requested status.
        to: JournalEntryStatus,
    },

    /// Rejection without a comment.
    #[error("A comment is required to reject a journal entry")]
    CommentRequired,

    /// Path id is not an integer.
    #[error("Invalid journal entry id: {0}")]
    InvalidId(String),

    /// Entry does not exist.
    #[error("Journal entry {0} not found")]
    NotFound(JournalEntryId),

    /// Transaction edit with nothing to change.
    #[error("Nothing to update")]
    EmptyEdit,

    /// Transaction belongs to a rejected entry.
    #[error("Transaction {0} belongs to a rejected journal entry")]
    TransactionClosed(TransactionId),
}

fn format_ids(ids: &[AccountId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl JournalError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingFields(_)
            | Self::EmptyTransactions
            | Self::InvalidAccountId(_)
            | Self::InvalidEntryType(_)
            | Self::InvalidAmount(_)
            | Self::Unbalanced { .. }
            | Self::InvalidAccounts(_)
            | Self::CommentRequired
            | Self::InvalidId(_)
            | Self::EmptyEdit => 400,

            Self::NotFound(_) => 404,

            Self::InvalidTransition { .. } | Self::TransactionClosed(_) => 409,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingFields(_) => "MISSING_FIELDS",
            Self::EmptyTransactions => "EMPTY_TRANSACTIONS",
            Self::InvalidAccountId(_) => "INVALID_ACCOUNT_ID",
            Self::InvalidEntryType(_) => "INVALID_TRANSACTION_TYPE",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::Unbalanced { .. } => "UNBALANCED_ENTRY",
            Self::InvalidAccounts(_) => "INVALID_ACCOUNTS",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::CommentRequired => "COMMENT_REQUIRED",
            Self::InvalidId(_) => "INVALID_ID",
            Self::NotFound(_) => "JOURNAL_ENTRY_NOT_FOUND",
            Self::EmptyEdit => "EMPTY_UPDATE",
            Self::TransactionClosed(_) => "TRANSACTION_CLOSED",
        }
    }
}

impl From<JournalError> for AppError {
    fn from(err: JournalError) -> Self {
        match err.status_code() {
            404 => Self::NotFound(err.to_string()),
            409 => Self::Conflict(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(JournalError::EmptyTransactions, 400, "EMPTY_TRANSACTIONS")]
    #[case(JournalError::CommentRequired, 400, "COMMENT_REQUIRED")]
    #[case(JournalError::NotFound(JournalEntryId::new(3)), 404, "JOURNAL_ENTRY_NOT_FOUND")]
    #[case(
        JournalError::InvalidTransition {
            from: JournalEntryStatus::Approved,
            to: JournalEntryStatus::Approved,
        },
        409,
        "INVALID_TRANSITION"
    )]
    fn test_status_and_code(
        #[case] err: JournalError,
        #[case] status: u16,
        #[case] code: &str,
    ) {
        assert_eq!(err.status_code(), status);
        assert_eq!(err.error_code(), code);
    }

    #[test]
    fn test_unbalanced_message_carries_totals() {
        let err = JournalError::Unbalanced {
            debit_total: dec!(100.00),
            credit_total: dec!(90.00),
        };
        assert_eq!(err.to_string(), "Debits (100.00) must equal credits (90.00)");
    }

    #[test]
    fn test_messages_list_values() {
        let err = JournalError::MissingFields(vec!["description", "date"]);
        assert_eq!(err.to_string(), "Missing required fields: description, date");

        let err = JournalError::InvalidAccounts(vec![AccountId::new(4), AccountId::new(9)]);
        assert_eq!(err.to_string(), "Invalid or inactive accounts: 4, 9");
    }

    #[test]
    fn test_into_app_error() {
        let err: AppError = JournalError::InvalidTransition {
            from: JournalEntryStatus::Rejected,
            to: JournalEntryStatus::Approved,
        }
        .into();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
