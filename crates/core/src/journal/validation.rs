//! Journal entry input validation.
//!
//! Validation runs in a fixed order so callers get the first problem a
//! bookkeeper would care about: missing fields, then unreadable account ids,
//! then line types and amounts, then the debit/credit balance. Account
//! existence needs a lookup and runs last through [`ensure_accounts_postable`].

use rust_decimal::Decimal;
use serde_json::Value;
use tally_shared::types::{AccountId, UserId};

use crate::journal::error::JournalError;
use crate::journal::types::{
    AccountAvailability, DraftLine, JournalEntryDraft, ValidatedEntry, ValidatedLine,
};
use crate::ledger::EntryType;

/// Maximum number of decimal places accepted on an amount.
pub const AMOUNT_SCALE: u32 = 2;

/// Validates a submitted entry up to (not including) account lookups.
///
/// # Errors
///
/// Returns the first [`JournalError`] found.
pub fn validate_draft(draft: JournalEntryDraft) -> Result<ValidatedEntry, JournalError> {
    let description = draft
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    let mut missing = Vec::new();
    if description.is_none() {
        missing.push("description");
    }
    if draft.date.is_none() {
        missing.push("date");
    }
    if draft.user_id.is_none() {
        missing.push("userId");
    }
    if draft.transactions.is_none() {
        missing.push("transactions");
    }
    let (Some(description), Some(date), Some(user_id), Some(lines)) =
        (description, draft.date, draft.user_id, draft.transactions)
    else {
        return Err(JournalError::MissingFields(missing));
    };
    if lines.is_empty() {
        return Err(JournalError::EmptyTransactions);
    }

    let line_missing = missing_line_fields(&lines);
    if !line_missing.is_empty() {
        return Err(JournalError::MissingFields(line_missing));
    }

    let account_ids = lines
        .iter()
        .map(|line| coerce_account_id(line.account_id.as_ref().unwrap_or(&Value::Null)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut validated = Vec::with_capacity(lines.len());
    for (line, account_id) in lines.into_iter().zip(account_ids) {
        let raw_type = line.entry_type.unwrap_or_default();
        let entry_type =
            EntryType::parse(&raw_type).ok_or(JournalError::InvalidEntryType(raw_type))?;
        let amount = line.amount.unwrap_or_default();
        ensure_valid_amount(amount)?;
        validated.push(ValidatedLine {
            account_id,
            entry_type,
            amount,
            description: line
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| description.clone()),
            date: line.date.unwrap_or(date),
        });
    }

    let total = ensure_balanced(validated.iter().map(|l| (l.entry_type, l.amount)))?;

    Ok(ValidatedEntry {
        description,
        date,
        is_adjusting: draft.is_adjusting.unwrap_or(false),
        created_by: UserId::new(user_id),
        lines: validated,
        total,
    })
}

fn missing_line_fields(lines: &[DraftLine]) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if lines
        .iter()
        .any(|l| l.account_id.as_ref().is_none_or(Value::is_null))
    {
        missing.push("transactions.accountId");
    }
    if lines.iter().any(|l| l.entry_type.is_none()) {
        missing.push("transactions.type");
    }
    if lines.iter().any(|l| l.amount.is_none()) {
        missing.push("transactions.amount");
    }
    missing
}

/// Reads an account id sent either as a JSON integer or as a numeric string.
///
/// # Errors
///
/// Returns [`JournalError::InvalidAccountId`] for anything else.
pub fn coerce_account_id(raw: &Value) -> Result<AccountId, JournalError> {
    let parsed = match raw {
        Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    };
    parsed
        .filter(|id| *id > 0)
        .map(AccountId::new)
        .ok_or_else(|| JournalError::InvalidAccountId(raw.to_string()))
}

/// Amounts are strictly positive with at most two decimal places.
///
/// # Errors
///
/// Returns [`JournalError::InvalidAmount`] otherwise.
pub fn ensure_valid_amount(amount: Decimal) -> Result<(), JournalError> {
    if amount <= Decimal::ZERO || amount.normalize().scale() > AMOUNT_SCALE {
        return Err(JournalError::InvalidAmount(amount));
    }
    Ok(())
}

/// Checks that debits equal credits exactly and returns the common total.
///
/// # Errors
///
/// Returns [`JournalError::Unbalanced`] carrying both totals.
pub fn ensure_balanced(
    lines: impl IntoIterator<Item = (EntryType, Decimal)>,
) -> Result<Decimal, JournalError> {
    let (debit_total, credit_total) = lines.into_iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(debits, credits), (entry_type, amount)| match entry_type {
            EntryType::Debit => (debits + amount, credits),
            EntryType::Credit => (debits, credits + amount),
        },
    );
    if debit_total != credit_total {
        return Err(JournalError::Unbalanced {
            debit_total,
            credit_total,
        });
    }
    Ok(debit_total)
}

/// Checks every referenced account exists and is active.
///
/// `lookup` reports the availability of one account.
///
/// # Errors
///
/// Returns [`JournalError::InvalidAccounts`] listing every failing id.
pub fn ensure_accounts_postable(
    entry: &ValidatedEntry,
    lookup: impl Fn(AccountId) -> AccountAvailability,
) -> Result<(), JournalError> {
    let invalid: Vec<AccountId> = entry
        .account_ids()
        .into_iter()
        .filter(|id| lookup(*id) != AccountAvailability::Active)
        .collect();
    if invalid.is_empty() {
        Ok(())
    } else {
        Err(JournalError::InvalidAccounts(invalid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn draft(lines: Value) -> JournalEntryDraft {
        serde_json::from_value(json!({
            "description": "Cash sale",
            "date": "2026-03-01",
            "userId": 1,
            "transactions": lines,
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_entry() {
        let entry = validate_draft(draft(json!([
            { "accountId": 1, "type": "DEBIT", "amount": "500.00" },
            { "accountId": "2", "type": "CREDIT", "amount": 500, "description": "Sales" }
        ])))
        .unwrap();
        assert_eq!(entry.total, dec!(500));
        assert_eq!(entry.lines.len(), 2);
        assert_eq!(entry.lines[0].description, "Cash sale");
        assert_eq!(entry.lines[1].description, "Sales");
        assert_eq!(entry.lines[1].account_id, AccountId::new(2));
        assert_eq!(entry.lines[0].date, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert!(!entry.is_adjusting);
    }

    #[test]
    fn test_missing_fields_listed() {
        let err = validate_draft(JournalEntryDraft::default()).unwrap_err();
        match err {
            JournalError::MissingFields(fields) => {
                assert_eq!(fields, vec!["description", "date", "userId", "transactions"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_blank_description_is_missing() {
        let mut d = draft(json!([]));
        d.description = Some("   ".into());
        assert!(matches!(
            validate_draft(d),
            Err(JournalError::MissingFields(f)) if f == vec!["description"]
        ));
    }

    #[test]
    fn test_empty_transactions() {
        assert!(matches!(
            validate_draft(draft(json!([]))),
            Err(JournalError::EmptyTransactions)
        ));
    }

    #[test]
    fn test_line_missing_amount() {
        let err = validate_draft(draft(json!([
            { "accountId": 1, "type": "DEBIT" }
        ])))
        .unwrap_err();
        assert!(matches!(err, JournalError::MissingFields(f) if f == vec!["transactions.amount"]));
    }

    #[test]
    fn test_non_numeric_account_id() {
        let err = validate_draft(draft(json!([
            { "accountId": "cash", "type": "DEBIT", "amount": 1 },
            { "accountId": 2, "type": "CREDIT", "amount": 1 }
        ])))
        .unwrap_err();
        assert!(matches!(err, JournalError::InvalidAccountId(_)));
    }

    #[test]
    fn test_account_id_checked_before_balance() {
        let err = validate_draft(draft(json!([
            { "accountId": 1.5, "type": "DEBIT", "amount": 1 },
            { "accountId": 2, "type": "CREDIT", "amount": 2 }
        ])))
        .unwrap_err();
        assert!(matches!(err, JournalError::InvalidAccountId(_)));
    }

    #[test]
    fn test_unknown_type() {
        let err = validate_draft(draft(json!([
            { "accountId": 1, "type": "BOTH", "amount": 1 }
        ])))
        .unwrap_err();
        assert!(matches!(err, JournalError::InvalidEntryType(t) if t == "BOTH"));
    }

    #[test]
    fn test_unbalanced_reports_totals() {
        let err = validate_draft(draft(json!([
            { "accountId": 1, "type": "DEBIT", "amount": "100.00" },
            { "accountId": 2, "type": "CREDIT", "amount": "90.00" }
        ])))
        .unwrap_err();
        match err {
            JournalError::Unbalanced {
                debit_total,
                credit_total,
            } => {
                assert_eq!(debit_total, dec!(100));
                assert_eq!(credit_total, dec!(90));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_one_sided_entry_is_unbalanced() {
        let err = validate_draft(draft(json!([
            { "accountId": 1, "type": "DEBIT", "amount": 5 }
        ])))
        .unwrap_err();
        assert!(matches!(err, JournalError::Unbalanced { .. }));
    }

    #[test]
    fn test_amount_rules() {
        assert!(ensure_valid_amount(dec!(0.01)).is_ok());
        assert!(ensure_valid_amount(dec!(10.500)).is_ok());
        assert!(ensure_valid_amount(dec!(0)).is_err());
        assert!(ensure_valid_amount(dec!(-3)).is_err());
        assert!(ensure_valid_amount(dec!(1.005)).is_err());
    }

    #[test]
    fn test_coerce_account_id() {
        assert_eq!(coerce_account_id(&json!(7)).unwrap(), AccountId::new(7));
        assert_eq!(coerce_account_id(&json!(" 12 ")).unwrap(), AccountId::new(12));
        assert!(coerce_account_id(&json!(null)).is_err());
        assert!(coerce_account_id(&json!(-1)).is_err());
        assert!(coerce_account_id(&json!(true)).is_err());
        assert!(coerce_account_id(&json!(9_999_999_999_i64)).is_err());
    }

    #[test]
    fn test_accounts_postable() {
        let entry = validate_draft(draft(json!([
            { "accountId": 1, "type": "DEBIT", "amount": 5 },
            { "accountId": 2, "type": "CREDIT", "amount": 3 },
            { "accountId": 3, "type": "CREDIT", "amount": 2 }
        ])))
        .unwrap();

        let lookup = |id: AccountId| match id.into_inner() {
            1 => AccountAvailability::Active,
            2 => AccountAvailability::Inactive,
            _ => AccountAvailability::Missing,
        };
        let err = ensure_accounts_postable(&entry, lookup).unwrap_err();
        assert!(matches!(
            err,
            JournalError::InvalidAccounts(ids) if ids == vec![AccountId::new(2), AccountId::new(3)]
        ));

        assert!(ensure_accounts_postable(&entry, |_| AccountAvailability::Active).is_ok());
    }
}
