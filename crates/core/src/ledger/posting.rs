//! Posting engine.
//!
//! Applies an approved journal entry's lines to account balances. Lines are
//! posted strictly in creation order through a per-account accumulator, so a
//! second line on the same account starts from the balance the first one left.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, TransactionId};

use super::balance::AccountBalance;
use super::entry::EntryType;
use super::error::LedgerError;

/// One transaction line waiting to be posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostingLine {
    /// Transaction row being posted.
    pub transaction_id: TransactionId,
    /// Account the line affects.
    pub account_id: AccountId,
    /// Debit or credit.
    pub entry_type: EntryType,
    /// Positive amount.
    pub amount: Decimal,
}

/// Result of posting one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostedLine {
    /// Transaction row that was posted.
    pub transaction_id: TransactionId,
    /// Account the line affected.
    pub account_id: AccountId,
    /// Account balance immediately after the line.
    pub balance: Decimal,
}

/// Per-account balance accumulator threaded through one posting run.
#[derive(Debug, Clone, Default)]
pub struct PostingLedger {
    accounts: BTreeMap<AccountId, AccountBalance>,
}

impl PostingLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the accumulator with an account's stored state.
    #[must_use]
    pub fn with_account(mut self, account_id: AccountId, state: AccountBalance) -> Self {
        self.accounts.insert(account_id, state);
        self
    }

    /// Current state of a seeded account.
    #[must_use]
    pub fn account(&self, account_id: AccountId) -> Option<&AccountBalance> {
        self.accounts.get(&account_id)
    }

    /// Posts one line.
    ///
    /// # Errors
    ///
    /// Fails if the amount is not positive or the account was never seeded.
    pub fn post(&mut self, line: PostingLine) -> Result<PostedLine, LedgerError> {
        if line.amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount(line.transaction_id));
        }
        let state = self
            .accounts
            .get_mut(&line.account_id)
            .ok_or(LedgerError::AccountNotLoaded(line.account_id))?;
        let balance = state.apply(line.entry_type, line.amount);
        Ok(PostedLine {
            transaction_id: line.transaction_id,
            account_id: line.account_id,
            balance,
        })
    }

    /// Posts every line in order. Stops at the first failure.
    ///
    /// # Errors
    ///
    /// Propagates the first [`LedgerError`] raised by [`Self::post`].
    pub fn post_all(
        &mut self,
        lines: impl IntoIterator<Item = PostingLine>,
    ) -> Result<Vec<PostedLine>, LedgerError> {
        lines.into_iter().map(|line| self.post(line)).collect()
    }

    /// Final per-account states, in account id order.
    #[must_use]
    pub fn into_accounts(self) -> Vec<(AccountId, AccountBalance)> {
        self.accounts.into_iter().collect()
    }
}

/// An approved transaction in an account's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryLine {
    /// Transaction row.
    pub transaction_id: TransactionId,
    /// Ledger date.
    pub date: NaiveDate,
    /// Debit or credit.
    pub entry_type: EntryType,
    /// Positive amount.
    pub amount: Decimal,
    /// Running balance currently stored on the row.
    pub stored_balance: Decimal,
}

/// Outcome of replaying an account's running-balance chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recomputed {
    /// New snapshots for every replayed transaction, in ledger order.
    pub snapshots: Vec<PostedSnapshot>,
    /// Account state after the whole history.
    pub account: AccountBalance,
}

/// New running balance for one replayed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostedSnapshot {
    /// Transaction row.
    pub transaction_id: TransactionId,
    /// Running balance after the row.
    pub balance: Decimal,
}

/// Replays running balances after a posted transaction was edited.
///
/// `history` is every approved transaction on the account. It is sorted by
/// (date, id) and the whole chain is rebuilt from zero with the same
/// normal-side rule posting uses. Stored snapshots are never reused: they were
/// taken in approval order, which can differ from ledger order.
#[must_use]
pub fn recompute_chain(mut account: AccountBalance, history: &mut [HistoryLine]) -> Recomputed {
    history.sort_by_key(|line| (line.date, line.transaction_id));

    account.total_debits = Decimal::ZERO;
    account.total_credits = Decimal::ZERO;
    account.balance = Decimal::ZERO;

    let snapshots = history
        .iter()
        .map(|line| PostedSnapshot {
            transaction_id: line.transaction_id,
            balance: account.apply(line.entry_type, line.amount),
        })
        .collect();

    Recomputed { snapshots, account }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::NormalSide;
    use rust_decimal_macros::dec;

    fn line(tx: i32, account: i32, entry_type: EntryType, amount: Decimal) -> PostingLine {
        PostingLine {
            transaction_id: TransactionId::new(tx),
            account_id: AccountId::new(account),
            entry_type,
            amount,
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    #[test]
    fn test_debit_on_debit_account_increases() {
        let mut ledger = PostingLedger::new().with_account(
            AccountId::new(1),
            AccountBalance {
                normal_side: NormalSide::Debit,
                balance: dec!(400),
                total_debits: dec!(400),
                total_credits: dec!(0),
            },
        );
        let posted = ledger.post(line(10, 1, EntryType::Debit, dec!(100))).unwrap();
        assert_eq!(posted.balance, dec!(500));
    }

    #[test]
    fn test_credit_on_debit_account_decreases() {
        let mut ledger = PostingLedger::new().with_account(
            AccountId::new(1),
            AccountBalance {
                normal_side: NormalSide::Debit,
                balance: dec!(400),
                total_debits: dec!(400),
                total_credits: dec!(0),
            },
        );
        let posted = ledger.post(line(10, 1, EntryType::Credit, dec!(100))).unwrap();
        assert_eq!(posted.balance, dec!(300));
        let state = ledger.account(AccountId::new(1)).unwrap();
        assert_eq!(state.total_credits, dec!(100));
        assert_eq!(state.total_debits, dec!(400));
    }

    #[test]
    fn test_lines_on_same_account_chain() {
        let mut ledger = PostingLedger::new()
            .with_account(AccountId::new(1), AccountBalance::new(NormalSide::Debit))
            .with_account(AccountId::new(2), AccountBalance::new(NormalSide::Credit));

        let posted = ledger
            .post_all([
                line(1, 1, EntryType::Debit, dec!(70)),
                line(2, 1, EntryType::Debit, dec!(30)),
                line(3, 2, EntryType::Credit, dec!(100)),
            ])
            .unwrap();

        let balances: Vec<_> = posted.iter().map(|p| p.balance).collect();
        assert_eq!(balances, vec![dec!(70), dec!(100), dec!(100)]);

        let accounts = ledger.into_accounts();
        assert_eq!(accounts[0].1.balance, dec!(100));
        assert_eq!(accounts[0].1.total_debits, dec!(100));
        assert_eq!(accounts[1].1.balance, dec!(100));
        assert_eq!(accounts[1].1.total_credits, dec!(100));
    }

    #[test]
    fn test_unknown_account_aborts_run() {
        let mut ledger =
            PostingLedger::new().with_account(AccountId::new(1), AccountBalance::new(NormalSide::Debit));
        let result = ledger.post_all([
            line(1, 1, EntryType::Debit, dec!(10)),
            line(2, 9, EntryType::Credit, dec!(10)),
        ]);
        assert!(matches!(result, Err(LedgerError::AccountNotLoaded(id)) if id == AccountId::new(9)));
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let mut ledger =
            PostingLedger::new().with_account(AccountId::new(1), AccountBalance::new(NormalSide::Debit));
        assert!(matches!(
            ledger.post(line(1, 1, EntryType::Debit, dec!(0))),
            Err(LedgerError::NonPositiveAmount(_))
        ));
    }

    #[test]
    fn test_recompute_rebuilds_whole_chain() {
        // Seed 500 on day 1, +100 on day 5 (edited from 50), then -20 on day 9.
        let mut history = vec![
            HistoryLine {
                transaction_id: TransactionId::new(3),
                date: date(9),
                entry_type: EntryType::Credit,
                amount: dec!(20),
                stored_balance: dec!(530),
            },
            HistoryLine {
                transaction_id: TransactionId::new(1),
                date: date(1),
                entry_type: EntryType::Debit,
                amount: dec!(500),
                stored_balance: dec!(500),
            },
            HistoryLine {
                transaction_id: TransactionId::new(2),
                date: date(5),
                entry_type: EntryType::Debit,
                amount: dec!(100),
                stored_balance: dec!(550),
            },
        ];

        let result = recompute_chain(AccountBalance::new(NormalSide::Debit), &mut history);

        let balances: Vec<_> = result
            .snapshots
            .iter()
            .map(|s| (s.transaction_id.into_inner(), s.balance))
            .collect();
        assert_eq!(balances, vec![(1, dec!(500)), (2, dec!(600)), (3, dec!(580))]);
        assert_eq!(result.account.balance, dec!(580));
        assert_eq!(result.account.total_debits, dec!(600));
        assert_eq!(result.account.total_credits, dec!(20));
    }

    #[test]
    fn test_recompute_ignores_snapshots_taken_out_of_date_order() {
        // The day-10 seed was posted first; the day-1 debit was approved later
        // and its stored snapshot already includes the seed.
        let mut history = vec![
            HistoryLine {
                transaction_id: TransactionId::new(1),
                date: date(10),
                entry_type: EntryType::Debit,
                amount: dec!(500),
                stored_balance: dec!(500),
            },
            HistoryLine {
                transaction_id: TransactionId::new(2),
                date: date(1),
                entry_type: EntryType::Debit,
                amount: dec!(100),
                stored_balance: dec!(600),
            },
            HistoryLine {
                transaction_id: TransactionId::new(3),
                date: date(5),
                entry_type: EntryType::Debit,
                amount: dec!(60),
                stored_balance: dec!(660),
            },
        ];

        let result = recompute_chain(AccountBalance::new(NormalSide::Debit), &mut history);

        assert_eq!(result.account.balance, dec!(660));
        assert_eq!(result.account.total_debits, dec!(660));
        let balances: Vec<_> = result.snapshots.iter().map(|s| s.balance).collect();
        assert_eq!(balances, vec![dec!(100), dec!(160), dec!(660)]);
    }

    #[test]
    fn test_recompute_uses_normal_side_sign() {
        let mut history = vec![
            HistoryLine {
                transaction_id: TransactionId::new(1),
                date: date(2),
                entry_type: EntryType::Credit,
                amount: dec!(300),
                stored_balance: dec!(0),
            },
            HistoryLine {
                transaction_id: TransactionId::new(2),
                date: date(3),
                entry_type: EntryType::Debit,
                amount: dec!(50),
                stored_balance: dec!(0),
            },
        ];

        let result = recompute_chain(AccountBalance::new(NormalSide::Credit), &mut history);

        assert_eq!(result.snapshots[0].balance, dec!(300));
        assert_eq!(result.snapshots[1].balance, dec!(250));
        assert_eq!(result.account.balance, dec!(250));
    }

    #[test]
    fn test_recompute_same_date_orders_by_id() {
        let mut history = vec![
            HistoryLine {
                transaction_id: TransactionId::new(8),
                date: date(4),
                entry_type: EntryType::Debit,
                amount: dec!(5),
                stored_balance: dec!(0),
            },
            HistoryLine {
                transaction_id: TransactionId::new(7),
                date: date(4),
                entry_type: EntryType::Debit,
                amount: dec!(10),
                stored_balance: dec!(0),
            },
        ];

        let result = recompute_chain(AccountBalance::new(NormalSide::Debit), &mut history);

        assert_eq!(result.snapshots[0].transaction_id, TransactionId::new(7));
        assert_eq!(result.snapshots[0].balance, dec!(10));
        assert_eq!(result.snapshots[1].balance, dec!(15));
    }
}
