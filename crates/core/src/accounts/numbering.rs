//! Account number generation.
//!
//! Numbers are 10 digits. The leading digit encodes the account class and
//! consecutive accounts in a class are spaced 50 apart so accounts can be
//! slotted in between by hand later.

use crate::accounts::classification::AccountClass;
use crate::accounts::error::AccountRuleError;

/// Gap between consecutive generated numbers in one class.
pub const ACCOUNT_NUMBER_STEP: i64 = 50;

/// Width of the numeric space owned by one class.
const CLASS_SPAN: i64 = 1_000_000_000;

/// Computes the next number for a class given the highest number issued so far.
///
/// # Errors
///
/// Returns [`AccountRuleError::NumberSpaceExhausted`] when the next number
/// would spill into the following class.
pub fn next_account_number(class: AccountClass, last: Option<i64>) -> Result<i64, AccountRuleError> {
    let Some(last) = last else {
        return Ok(class.prefix());
    };
    let next = last.max(class.prefix()) + ACCOUNT_NUMBER_STEP;
    if next >= class.prefix() + CLASS_SPAN {
        return Err(AccountRuleError::NumberSpaceExhausted(class));
    }
    Ok(next)
}

/// Finds the highest existing number in `class` among `numbers`.
///
/// Only numbers that parse as integers and share the class's leading digit
/// and width are considered.
pub fn highest_in_class<'a>(
    class: AccountClass,
    numbers: impl IntoIterator<Item = &'a str>,
) -> Option<i64> {
    numbers
        .into_iter()
        .map(str::trim)
        .filter(|n| n.len() == 10 && n.starts_with(class.leading_digit()))
        .filter_map(|n| n.parse::<i64>().ok())
        .max()
}

/// Formats a generated number for storage.
#[must_use]
pub fn format_account_number(number: i64) -> String {
    format!("{number:010}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_number_is_prefix() {
        assert_eq!(
            next_account_number(AccountClass::Asset, None).unwrap(),
            1_000_000_000
        );
        assert_eq!(
            format_account_number(next_account_number(AccountClass::Asset, None).unwrap()),
            "1000000000"
        );
    }

    #[test]
    fn test_second_number_adds_step() {
        let first = next_account_number(AccountClass::Revenue, None).unwrap();
        let second = next_account_number(AccountClass::Revenue, Some(first)).unwrap();
        assert_eq!(second, 4_000_000_050);
    }

    #[test]
    fn test_manual_insert_respected() {
        // A hand-entered 1000000075 pushes the sequence past it.
        let numbers = ["1000000000", "1000000050", "1000000075", "2000000000"];
        let last = highest_in_class(AccountClass::Asset, numbers);
        assert_eq!(last, Some(1_000_000_075));
        assert_eq!(
            next_account_number(AccountClass::Asset, last).unwrap(),
            1_000_000_125
        );
    }

    #[test]
    fn test_highest_ignores_other_classes_and_junk() {
        let numbers = ["2000000100", "ABC", "10", "1000000050"];
        assert_eq!(highest_in_class(AccountClass::Liability, numbers), Some(2_000_000_100));
        assert_eq!(highest_in_class(AccountClass::Equity, numbers), None);
        assert_eq!(highest_in_class(AccountClass::Asset, numbers), Some(1_000_000_050));
    }

    #[test]
    fn test_number_space_exhausted() {
        assert!(matches!(
            next_account_number(AccountClass::Expenses, Some(5_999_999_990)),
            Err(AccountRuleError::NumberSpaceExhausted(AccountClass::Expenses))
        ));
    }
}
