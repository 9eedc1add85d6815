//! Report repository: loads a consistent ledger snapshot for the aggregator.

use std::collections::HashMap;

use sea_orm::{
    AccessMode, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IsolationLevel, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::debug;

use tally_core::accounts::StatementKind;
use tally_core::reports::{
    DateRange, FinancialReport, Ratio, ReportAccount, ReportError, ReportKind, ReportLine,
    ReportService, compute_ratios,
};
use tally_shared::types::AccountId;

use crate::entities::{
    account_orders, accounts, categories, statements, subcategories, transactions,
};

/// Error types for report operations.
#[derive(Debug, thiserror::Error)]
pub enum ReportRepoError {
    /// Aggregation failure.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ReportRepoError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Report(e) => e.status_code(),
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Report(e) => e.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// Accounts and approved lines read from one database snapshot.
#[derive(Debug, Clone, Default)]
pub struct LedgerSnapshot {
    /// Every account with its classification.
    pub accounts: Vec<ReportAccount>,
    /// Approved transactions inside the requested range.
    pub lines: Vec<ReportLine>,
}

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds one report over `range`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::NoDataFound`] when the range holds no relevant
    /// activity, or a database error.
    pub async fn generate(
        &self,
        kind: ReportKind,
        range: DateRange,
    ) -> Result<FinancialReport, ReportRepoError> {
        let snapshot = self.snapshot(range).await?;
        debug!(
            report = %kind,
            accounts = snapshot.accounts.len(),
            lines = snapshot.lines.len(),
            "Generating report"
        );
        Ok(ReportService::generate(
            kind,
            &snapshot.accounts,
            &snapshot.lines,
            range,
        )?)
    }

    /// Computes the financial ratios from current account balances.
    ///
    /// # Errors
    ///
    /// Returns an error if the accounts cannot be read.
    pub async fn ratios(&self) -> Result<Vec<Ratio>, ReportRepoError> {
        let accounts = load_accounts(&self.db).await?;
        Ok(compute_ratios(&accounts))
    }

    /// Reads accounts and in-range approved lines inside one read-only
    /// REPEATABLE READ transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any query fails.
    pub async fn snapshot(&self, range: DateRange) -> Result<LedgerSnapshot, DbErr> {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::RepeatableRead),
                Some(AccessMode::ReadOnly),
            )
            .await?;

        let accounts = load_accounts(&txn).await?;
        let lines = load_lines(&txn, range).await?;

        txn.commit().await?;

        Ok(LedgerSnapshot { accounts, lines })
    }
}

async fn load_accounts<C: ConnectionTrait>(conn: &C) -> Result<Vec<ReportAccount>, DbErr> {
    let statement_names: HashMap<i32, String> = statements::Entity::find()
        .all(conn)
        .await?
        .into_iter()
        .map(|s| (s.id, s.name))
        .collect();
    let category_names: HashMap<i32, String> = categories::Entity::find()
        .all(conn)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    let subcategory_names: HashMap<i32, String> = subcategories::Entity::find()
        .all(conn)
        .await?
        .into_iter()
        .map(|s| (s.id, s.name))
        .collect();
    let positions: HashMap<i32, i32> = account_orders::Entity::find()
        .all(conn)
        .await?
        .into_iter()
        .map(|o| (o.id, o.position))
        .collect();

    let rows = accounts::Entity::find()
        .order_by_asc(accounts::Column::Number)
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|a| ReportAccount {
            account_id: AccountId::new(a.id),
            statement: statement_names
                .get(&a.statement_id)
                .and_then(|name| StatementKind::parse(name)),
            category: category_names
                .get(&a.category_id)
                .cloned()
                .unwrap_or_default(),
            subcategory: a
                .subcategory_id
                .and_then(|id| subcategory_names.get(&id).cloned()),
            order: positions.get(&a.order_id).copied().unwrap_or(i32::MAX),
            normal_side: a.normal_side.into(),
            is_active: a.is_active,
            balance: a.balance,
            number: a.number,
            name: a.name,
        })
        .collect())
}

async fn load_lines<C: ConnectionTrait>(
    conn: &C,
    range: DateRange,
) -> Result<Vec<ReportLine>, DbErr> {
    let mut query =
        transactions::Entity::find().filter(transactions::Column::IsApproved.eq(true));
    if let Some(start) = range.start_date {
        query = query.filter(transactions::Column::Date.gte(start));
    }
    if let Some(end) = range.end_date {
        query = query.filter(transactions::Column::Date.lte(end));
    }

    Ok(query
        .order_by_asc(transactions::Column::Date)
        .order_by_asc(transactions::Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(|t| ReportLine {
            account_id: AccountId::new(t.account_id),
            entry_type: t.entry_type.into(),
            amount: t.amount,
            date: t.date,
            is_approved: t.is_approved,
        })
        .collect())
}
