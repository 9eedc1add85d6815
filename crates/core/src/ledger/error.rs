//! Posting engine error types.

use tally_shared::AppError;
use tally_shared::types::{AccountId, TransactionId};
use thiserror::Error;

/// Errors that can occur while posting lines to accounts.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A line referenced an account that was not loaded into the posting run.
    #[error("Account {0} was not loaded for posting")]
    AccountNotLoaded(AccountId),

    /// A line carried a zero or negative amount.
    #[error("Transaction {0} has a non-positive amount")]
    NonPositiveAmount(TransactionId),
}

impl LedgerError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::AccountNotLoaded(_) | Self::NonPositiveAmount(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AccountNotLoaded(_) => "ACCOUNT_NOT_LOADED",
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        Self::Internal(err.to_string())
    }
}
