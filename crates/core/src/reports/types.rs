//! Report data types.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::AccountId;

use crate::accounts::StatementKind;
use crate::ledger::{EntryType, NormalSide};
use crate::reports::error::ReportError;

/// Inclusive reporting window.
///
/// A missing start means "from the beginning", a missing end means
/// "open-ended".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// First included date.
    pub start_date: Option<NaiveDate>,
    /// Last included date.
    pub end_date: Option<NaiveDate>,
}

impl DateRange {
    /// Builds a range, rejecting a start after the end.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, ReportError> {
        if let (Some(start), Some(end)) = (start, end)
            && start > end
        {
            return Err(ReportError::InvalidDateRange { start, end });
        }
        Ok(Self {
            start_date: start,
            end_date: end,
        })
    }

    /// The unbounded range.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            start_date: None,
            end_date: None,
        }
    }

    /// True if `date` falls inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date.is_none_or(|s| date >= s) && self.end_date.is_none_or(|e| date <= e)
    }
}

/// Account metadata the aggregator needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportAccount {
    /// Account id.
    pub account_id: AccountId,
    /// Ten-digit account number.
    pub number: String,
    /// Account name.
    pub name: String,
    /// Normal side.
    pub normal_side: NormalSide,
    /// Statement group, if the statement name is recognised.
    pub statement: Option<StatementKind>,
    /// Category name.
    pub category: String,
    /// Subcategory name.
    pub subcategory: Option<String>,
    /// Display order position.
    pub order: i32,
    /// Whether the account is active.
    pub is_active: bool,
    /// Current running balance.
    pub balance: Decimal,
}

impl ReportAccount {
    /// "number - name" label used by the trial balance.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} - {}", self.number, self.name)
    }
}

/// A transaction as seen by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportLine {
    /// Account the line belongs to.
    pub account_id: AccountId,
    /// Debit or credit.
    pub entry_type: EntryType,
    /// Positive amount.
    pub amount: Decimal,
    /// Ledger date.
    pub date: NaiveDate,
    /// Only approved lines count.
    pub is_approved: bool,
}

/// Report selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    /// Trial balance.
    TrialBalance,
    /// Income statement.
    IncomeStatement,
    /// Balance sheet.
    BalanceSheet,
    /// Retained earnings statement.
    RetainedEarnings,
}

impl ReportKind {
    /// Every report kind.
    pub const ALL: [Self; 4] = [
        Self::TrialBalance,
        Self::IncomeStatement,
        Self::BalanceSheet,
        Self::RetainedEarnings,
    ];

    /// Path segment for the report.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TrialBalance => "trial-balance",
            Self::IncomeStatement => "income-statement",
            Self::BalanceSheet => "balance-sheet",
            Self::RetainedEarnings => "retained-earnings",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| ReportError::UnknownReportKind(s.to_string()))
    }
}

/// One trial balance row. The TOTAL row has no account id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalanceRow {
    /// Account id, `None` on the TOTAL row.
    pub account_id: Option<AccountId>,
    /// "number - name", or "TOTAL".
    pub account: String,
    /// In-range debits.
    pub debit: Decimal,
    /// In-range credits.
    pub credit: Decimal,
    /// Debit minus credit.
    pub balance: Decimal,
}

/// Trial balance, serialized as a bare array of rows ending with TOTAL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrialBalance {
    /// Account rows followed by the TOTAL row.
    pub rows: Vec<TrialBalanceRow>,
}

impl TrialBalance {
    /// Label of the summary row.
    pub const TOTAL_LABEL: &'static str = "TOTAL";

    /// The TOTAL row.
    #[must_use]
    pub fn total(&self) -> Option<&TrialBalanceRow> {
        self.rows.last().filter(|r| r.account_id.is_none())
    }
}

/// One account line on the income statement or balance sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementLine {
    /// Account id.
    pub account_id: AccountId,
    /// Account number.
    pub number: String,
    /// Account name.
    pub name: String,
    /// Statement group.
    pub statement: StatementKind,
    /// Reported balance.
    pub balance: Decimal,
}

/// Income statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStatement {
    /// Absolute value of the revenue sum.
    pub total_revenue: Decimal,
    /// Sum of absolute expense balances.
    pub total_expenses: Decimal,
    /// Revenue minus expenses.
    pub net_income: Decimal,
    /// Revenue accounts with activity.
    pub revenues: Vec<StatementLine>,
    /// Expense accounts with activity.
    pub expenses: Vec<StatementLine>,
}

/// Per-statement balance sheet totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BalanceSheetTotals {
    /// Total assets.
    pub asset: Decimal,
    /// Total liabilities.
    pub liability: Decimal,
    /// Total equity.
    pub equity: Decimal,
}

/// Balance sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheet {
    /// Asset, liability and equity accounts with activity.
    pub balance_sheet: Vec<StatementLine>,
    /// Totals per statement.
    pub totals: BalanceSheetTotals,
    /// Assets minus (liabilities plus equity).
    pub grand_total: Decimal,
}

/// Retained earnings statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetainedEarnings {
    /// Revenue minus expenses.
    pub retained_earnings: Decimal,
    /// Credits to operating revenue accounts.
    pub total_revenue: Decimal,
    /// Debits to operating expense accounts.
    pub total_expenses: Decimal,
}

/// Any of the four reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "report", rename_all = "kebab-case")]
pub enum FinancialReport {
    /// Trial balance.
    TrialBalance(TrialBalance),
    /// Income statement.
    IncomeStatement(IncomeStatement),
    /// Balance sheet.
    BalanceSheet(BalanceSheet),
    /// Retained earnings.
    RetainedEarnings(RetainedEarnings),
}

impl FinancialReport {
    /// Kind of the carried report.
    #[must_use]
    pub const fn kind(&self) -> ReportKind {
        match self {
            Self::TrialBalance(_) => ReportKind::TrialBalance,
            Self::IncomeStatement(_) => ReportKind::IncomeStatement,
            Self::BalanceSheet(_) => ReportKind::BalanceSheet,
            Self::RetainedEarnings(_) => ReportKind::RetainedEarnings,
        }
    }
}

/// Traffic-light tag on a ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatioColor {
    /// 2.0 and above.
    Green,
    /// From 1.0 up to 2.0.
    Yellow,
    /// Below 1.0.
    Red,
}

/// One financial ratio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ratio {
    /// Display name.
    pub name: String,
    /// Rounded value, `None` when the denominator is zero.
    pub value: Option<Decimal>,
    /// Numerator.
    pub numerator: Decimal,
    /// Denominator.
    pub denominator: Decimal,
    /// "<numerator> / <denominator>".
    pub formula: String,
    /// Tag, `None` when there is no value.
    pub color: Option<RatioColor>,
}
