//! Account registry rule errors.

use rust_decimal::Decimal;
use tally_shared::AppError;
use thiserror::Error;

use crate::accounts::classification::AccountClass;

/// Errors raised by account registry rules.
#[derive(Debug, Error)]
pub enum AccountRuleError {
    /// Category name is not part of the chart of accounts.
    #[error("Unknown account category '{0}'")]
    UnknownCategory(String),

    /// Account still carries a balance.
    #[error("Account balance must be zero to deactivate (current balance: {0})")]
    NonZeroBalance(Decimal),

    /// Account name is empty.
    #[error("Account name is required")]
    BlankName,

    /// Opening balance below zero.
    #[error("Initial balance cannot be negative: {0}")]
    NegativeInitialBalance(Decimal),

    /// No more numbers left in the class.
    #[error("No account numbers left for category {0}")]
    NumberSpaceExhausted(AccountClass),
}

impl AccountRuleError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UnknownCategory(_)
            | Self::NonZeroBalance(_)
            | Self::BlankName
            | Self::NegativeInitialBalance(_) => 400,
            Self::NumberSpaceExhausted(_) => 409,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCategory(_) => "UNKNOWN_CATEGORY",
            Self::NonZeroBalance(_) => "NONZERO_BALANCE",
            Self::BlankName => "NAME_REQUIRED",
            Self::NegativeInitialBalance(_) => "NEGATIVE_INITIAL_BALANCE",
            Self::NumberSpaceExhausted(_) => "ACCOUNT_NUMBERS_EXHAUSTED",
        }
    }
}

impl From<AccountRuleError> for AppError {
    fn from(err: AccountRuleError) -> Self {
        match err {
            AccountRuleError::NonZeroBalance(_) => Self::BusinessRule(err.to_string()),
            AccountRuleError::NumberSpaceExhausted(_) => Self::Conflict(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_nonzero_balance_error() {
        let err = AccountRuleError::NonZeroBalance(dec!(10));
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "NONZERO_BALANCE");
        assert!(err.to_string().contains("must be zero"));
        assert!(matches!(AppError::from(err), AppError::BusinessRule(_)));
    }

    #[test]
    fn test_unknown_category_error() {
        let err = AccountRuleError::UnknownCategory("X".into());
        assert_eq!(err.status_code(), 400);
        assert!(matches!(AppError::from(err), AppError::Validation(_)));
    }
}
