//! Report generation service.
//!
//! Every report is computed from approved lines inside a [`DateRange`]. The
//! caller loads accounts and lines from one consistent snapshot; nothing
//! here touches storage.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tally_shared::types::AccountId;

use super::error::ReportError;
use super::types::{
    BalanceSheet, BalanceSheetTotals, DateRange, FinancialReport, IncomeStatement,
    ReportAccount, ReportKind, ReportLine, RetainedEarnings, StatementLine, TrialBalance,
    TrialBalanceRow,
};
use crate::accounts::{StatementKind, same_class_name};
use crate::ledger::EntryType;

/// Category whose credits count as retained-earnings revenue.
pub const OPERATING_REVENUE: &str = "Operating Revenue";
/// Category whose debits count as retained-earnings expenses.
pub const OPERATING_EXPENSE: &str = "Operating Expense";

/// In-range activity for one account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Activity {
    debits: Decimal,
    credits: Decimal,
}

fn activity_by_account(lines: &[ReportLine], range: DateRange) -> HashMap<AccountId, Activity> {
    let mut map: HashMap<AccountId, Activity> = HashMap::new();
    for line in lines
        .iter()
        .filter(|l| l.is_approved && range.contains(l.date))
    {
        let entry = map.entry(line.account_id).or_default();
        match line.entry_type {
            EntryType::Debit => entry.debits += line.amount,
            EntryType::Credit => entry.credits += line.amount,
        }
    }
    map
}

fn statement_line(account: &ReportAccount, statement: StatementKind, balance: Decimal) -> StatementLine {
    StatementLine {
        account_id: account.account_id,
        number: account.number.clone(),
        name: account.name.clone(),
        statement,
        balance,
    }
}

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Dispatches to the requested report.
    pub fn generate(
        kind: ReportKind,
        accounts: &[ReportAccount],
        lines: &[ReportLine],
        range: DateRange,
    ) -> Result<FinancialReport, ReportError> {
        Ok(match kind {
            ReportKind::TrialBalance => {
                FinancialReport::TrialBalance(Self::trial_balance(accounts, lines, range)?)
            }
            ReportKind::IncomeStatement => {
                FinancialReport::IncomeStatement(Self::income_statement(accounts, lines, range)?)
            }
            ReportKind::BalanceSheet => {
                FinancialReport::BalanceSheet(Self::balance_sheet(accounts, lines, range)?)
            }
            ReportKind::RetainedEarnings => {
                FinancialReport::RetainedEarnings(Self::retained_earnings(accounts, lines, range)?)
            }
        })
    }

    /// Trial balance over active accounts, ordered by display order then number.
    ///
    /// Accounts without in-range activity appear with zeros. The last row is
    /// TOTAL, whose balance is total debits minus total credits.
    pub fn trial_balance(
        accounts: &[ReportAccount],
        lines: &[ReportLine],
        range: DateRange,
    ) -> Result<TrialBalance, ReportError> {
        let activity = activity_by_account(lines, range);

        let mut active: Vec<&ReportAccount> = accounts.iter().filter(|a| a.is_active).collect();
        active.sort_by(|a, b| (a.order, &a.number).cmp(&(b.order, &b.number)));

        if !active.iter().any(|a| activity.contains_key(&a.account_id)) {
            return Err(ReportError::NoDataFound(ReportKind::TrialBalance));
        }

        let mut rows: Vec<TrialBalanceRow> = active
            .into_iter()
            .map(|account| {
                let a = activity.get(&account.account_id).copied().unwrap_or_default();
                TrialBalanceRow {
                    account_id: Some(account.account_id),
                    account: account.label(),
                    debit: a.debits,
                    credit: a.credits,
                    balance: a.debits - a.credits,
                }
            })
            .collect();

        let debit: Decimal = rows.iter().map(|r| r.debit).sum();
        let credit: Decimal = rows.iter().map(|r| r.credit).sum();
        let balance: Decimal = rows.iter().map(|r| r.balance).sum();
        rows.push(TrialBalanceRow {
            account_id: None,
            account: TrialBalance::TOTAL_LABEL.to_string(),
            debit,
            credit,
            balance,
        });

        Ok(TrialBalance { rows })
    }

    /// Income statement.
    ///
    /// Each account's balance is credits minus debits. Revenue lines keep the
    /// sign, expense lines report the absolute value.
    pub fn income_statement(
        accounts: &[ReportAccount],
        lines: &[ReportLine],
        range: DateRange,
    ) -> Result<IncomeStatement, ReportError> {
        let activity = activity_by_account(lines, range);
        let mut revenues = Vec::new();
        let mut expenses = Vec::new();

        for account in accounts {
            let Some(a) = activity.get(&account.account_id) else {
                continue;
            };
            let balance = a.credits - a.debits;
            match account.statement {
                Some(StatementKind::Revenue) => {
                    revenues.push(statement_line(account, StatementKind::Revenue, balance));
                }
                Some(StatementKind::Expense) => {
                    expenses.push(statement_line(account, StatementKind::Expense, balance.abs()));
                }
                _ => {}
            }
        }

        if revenues.is_empty() && expenses.is_empty() {
            return Err(ReportError::NoDataFound(ReportKind::IncomeStatement));
        }

        let total_revenue = revenues.iter().map(|l| l.balance).sum::<Decimal>().abs();
        let total_expenses: Decimal = expenses.iter().map(|l| l.balance).sum();

        Ok(IncomeStatement {
            total_revenue,
            total_expenses,
            net_income: total_revenue - total_expenses,
            revenues,
            expenses,
        })
    }

    /// Balance sheet.
    ///
    /// Assets increase on DEBIT, liabilities and equity on CREDIT. The grand
    /// total is reported, not asserted.
    pub fn balance_sheet(
        accounts: &[ReportAccount],
        lines: &[ReportLine],
        range: DateRange,
    ) -> Result<BalanceSheet, ReportError> {
        let activity = activity_by_account(lines, range);
        let mut balance_sheet = Vec::new();
        let mut totals = BalanceSheetTotals::default();

        for account in accounts {
            let Some(a) = activity.get(&account.account_id) else {
                continue;
            };
            let (statement, balance) = match account.statement {
                Some(StatementKind::Asset) => (StatementKind::Asset, a.debits - a.credits),
                Some(s @ (StatementKind::Liability | StatementKind::Equity)) => {
                    (s, a.credits - a.debits)
                }
                _ => continue,
            };
            match statement {
                StatementKind::Asset => totals.asset += balance,
                StatementKind::Liability => totals.liability += balance,
                _ => totals.equity += balance,
            }
            balance_sheet.push(statement_line(account, statement, balance));
        }

        if totals.asset.is_zero() && totals.liability.is_zero() && totals.equity.is_zero() {
            return Err(ReportError::NoDataFound(ReportKind::BalanceSheet));
        }

        Ok(BalanceSheet {
            balance_sheet,
            totals,
            grand_total: totals.asset - (totals.liability + totals.equity),
        })
    }

    /// Retained earnings from the operating revenue and operating expense categories.
    pub fn retained_earnings(
        accounts: &[ReportAccount],
        lines: &[ReportLine],
        range: DateRange,
    ) -> Result<RetainedEarnings, ReportError> {
        let revenue_ids: Vec<AccountId> = accounts
            .iter()
            .filter(|a| same_class_name(&a.category, OPERATING_REVENUE))
            .map(|a| a.account_id)
            .collect();
        let expense_ids: Vec<AccountId> = accounts
            .iter()
            .filter(|a| same_class_name(&a.category, OPERATING_EXPENSE))
            .map(|a| a.account_id)
            .collect();

        let in_range = lines
            .iter()
            .filter(|l| l.is_approved && range.contains(l.date));
        let mut revenue_lines = 0usize;
        let mut expense_lines = 0usize;
        let mut total_revenue = Decimal::ZERO;
        let mut total_expenses = Decimal::ZERO;
        for line in in_range {
            if line.entry_type == EntryType::Credit && revenue_ids.contains(&line.account_id) {
                revenue_lines += 1;
                total_revenue += line.amount;
            } else if line.entry_type == EntryType::Debit && expense_ids.contains(&line.account_id)
            {
                expense_lines += 1;
                total_expenses += line.amount;
            }
        }

        if revenue_lines == 0 && expense_lines == 0 {
            return Err(ReportError::NoDataFound(ReportKind::RetainedEarnings));
        }

        Ok(RetainedEarnings {
            retained_earnings: total_revenue - total_expenses,
            total_revenue,
            total_expenses,
        })
    }
}
