//! Transaction repository for ledger line queries and edits.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;

use tally_core::audit::{AuditEvent, tables};
use tally_core::journal::{
    EditPlan, EditTarget, JournalEntryStatus, JournalError, TransactionEdit, ensure_balanced,
    plan_edit,
};
use tally_core::ledger::{HistoryLine, recompute_chain};
use tally_shared::types::{AccountId, TransactionId, UserId};

use super::event_log::record_event;
use super::journal_entry::account_state;
use crate::entities::{accounts, journal_entries, transactions};

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    NotFound(TransactionId),

    /// Edit rejected by the journal rules.
    #[error(transparent)]
    Journal(#[from] JournalError),

    /// Audit snapshot could not be serialized.
    #[error("Failed to serialize audit snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl TransactionError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Journal(e) => e.status_code(),
            Self::Snapshot(_) | Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::Journal(e) => e.error_code(),
            Self::Snapshot(_) => "INTERNAL_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// Filter options for listing transactions.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionFilter {
    /// Only lines on this account.
    pub account_id: Option<AccountId>,
    /// Filter by posted state.
    pub is_approved: Option<bool>,
}

/// Transaction repository.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists transactions in ledger order (date, then id).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_transactions(
        &self,
        filter: TransactionFilter,
    ) -> Result<Vec<transactions::Model>, TransactionError> {
        let mut query = transactions::Entity::find();
        if let Some(account_id) = filter.account_id {
            query = query.filter(transactions::Column::AccountId.eq(account_id.into_inner()));
        }
        if let Some(is_approved) = filter.is_approved {
            query = query.filter(transactions::Column::IsApproved.eq(is_approved));
        }
        Ok(query
            .order_by_asc(transactions::Column::Date)
            .order_by_asc(transactions::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Edits the description, amount or date of one transaction.
    ///
    /// Unposted lines are written in place; an amount change on a line of a
    /// pending entry must keep the entry balanced. Posted lines trigger a
    /// replay of the owning account's running balances from the earlier of
    /// the old and new dates, and the account totals are reset to the result.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The transaction does not exist
    /// - The edit is empty, has an invalid amount, or targets a rejected entry
    /// - The edit would unbalance a pending entry
    /// - The database operation fails
    pub async fn update_transaction(
        &self,
        id: TransactionId,
        edit: TransactionEdit,
        user_id: Option<UserId>,
    ) -> Result<transactions::Model, TransactionError> {
        let txn = self.db.begin().await?;

        let before = transactions::Entity::find_by_id(id.into_inner())
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(TransactionError::NotFound(id))?;

        let entry_status = match before.journal_entry_id {
            Some(entry_id) => journal_entries::Entity::find_by_id(entry_id)
                .lock_shared()
                .one(&txn)
                .await?
                .map(|entry| JournalEntryStatus::from(entry.status)),
            None => None,
        };

        let plan = plan_edit(
            &EditTarget {
                transaction_id: id,
                is_approved: before.is_approved,
                date: before.date,
                entry_status,
            },
            &edit,
        )?;

        if let EditPlan::InPlace {
            recheck_balance: true,
        } = plan
            && let (Some(entry_id), Some(amount)) = (before.journal_entry_id, edit.amount)
        {
            let siblings = transactions::Entity::find()
                .filter(transactions::Column::JournalEntryId.eq(entry_id))
                .all(&txn)
                .await?;
            ensure_balanced(siblings.iter().map(|line| {
                let amount = if line.id == before.id {
                    amount
                } else {
                    line.amount
                };
                (line.entry_type.into(), amount)
            }))?;
        }

        let now = Utc::now();
        let mut active: transactions::ActiveModel = before.clone().into();
        if let Some(description) = &edit.description {
            active.description = Set(description.trim().to_string());
        }
        if let Some(amount) = edit.amount {
            active.amount = Set(amount);
        }
        if let Some(date) = edit.date {
            active.date = Set(date);
        }
        active.updated_at = Set(now.into());
        let mut after = active.update(&txn).await?;

        if let EditPlan::Replay { from_date } = plan {
            let account = accounts::Entity::find_by_id(after.account_id)
                .lock_exclusive()
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    DbErr::RecordNotFound(format!("account {}", after.account_id))
                })?;

            let mut rows: HashMap<i32, transactions::Model> = transactions::Entity::find()
                .filter(transactions::Column::AccountId.eq(account.id))
                .filter(transactions::Column::IsApproved.eq(true))
                .all(&txn)
                .await?
                .into_iter()
                .map(|row| (row.id, row))
                .collect();
            let mut history: Vec<HistoryLine> = rows
                .values()
                .map(|row| HistoryLine {
                    transaction_id: TransactionId::new(row.id),
                    date: row.date,
                    entry_type: row.entry_type.into(),
                    amount: row.amount,
                    stored_balance: row.balance,
                })
                .collect();

            let replay = recompute_chain(account_state(&account), &mut history);

            for snapshot in &replay.snapshots {
                let row_id = snapshot.transaction_id.into_inner();
                let Some(row) = rows.remove(&row_id) else {
                    continue;
                };
                if row.balance == snapshot.balance && row_id != after.id {
                    continue;
                }
                let mut active: transactions::ActiveModel = row.into();
                active.balance = Set(snapshot.balance);
                active.updated_at = Set(now.into());
                let updated = active.update(&txn).await?;
                if updated.id == after.id {
                    after = updated;
                }
            }

            let mut account_update: accounts::ActiveModel = account.clone().into();
            account_update.balance = Set(replay.account.balance);
            account_update.total_debits = Set(replay.account.total_debits);
            account_update.total_credits = Set(replay.account.total_credits);
            account_update.updated_at = Set(now.into());
            let account_after = account_update.update(&txn).await?;
            record_event(
                &txn,
                AuditEvent::updated(
                    tables::ACCOUNTS,
                    account_after.id,
                    &account,
                    &account_after,
                    user_id,
                )?,
            )
            .await?;

            info!(
                account_id = account_after.id,
                from_date = %from_date,
                replayed = replay.snapshots.len(),
                balance = %account_after.balance,
                "Running balances replayed"
            );
        }

        record_event(
            &txn,
            AuditEvent::updated(tables::TRANSACTIONS, after.id, &before, &after, user_id)?,
        )
        .await?;

        txn.commit().await?;

        info!(
            transaction_id = after.id,
            account_id = after.account_id,
            posted = after.is_approved,
            "Transaction updated"
        );

        Ok(after)
    }
}
