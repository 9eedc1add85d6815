//! Journal entry repository: creation, review and posting.
//!
//! Approval runs as one database transaction. The entry row and every touched
//! account row are locked (accounts in id order), the lines are posted through
//! a [`PostingLedger`] in creation order, and all resulting rows are written
//! back before commit.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, Statement, TransactionTrait,
};
use serde::Serialize;
use tracing::{info, warn};

use tally_core::audit::{AuditEvent, tables};
use tally_core::journal::{
    AccountAvailability, JournalEntryDraft, JournalEntryStatus, JournalError, JournalWorkflow,
    ReviewAction, ensure_accounts_postable, format_pr, validate_draft,
};
use tally_core::ledger::{AccountBalance, LedgerError, PostingLedger, PostingLine};
use tally_shared::types::{
    AccountId, JournalEntryId, PageRequest, PageResponse, TransactionId, UserId,
};

use super::event_log::record_event;
use super::lookup::find_active_user;
use super::notification::NotificationRepository;
use crate::entities::{accounts, journal_entries, transactions};

/// Error types for journal entry operations.
#[derive(Debug, thiserror::Error)]
pub enum JournalEntryError {
    /// Validation or state machine failure.
    #[error(transparent)]
    Journal(#[from] JournalError),

    /// Posting failure.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Creator or reviewer does not exist or is inactive.
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// Audit snapshot could not be serialized.
    #[error("Failed to serialize audit snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl JournalEntryError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Journal(e) => e.status_code(),
            Self::Ledger(e) => e.status_code(),
            Self::UserNotFound(_) => 400,
            Self::Snapshot(_) | Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Journal(e) => e.error_code(),
            Self::Ledger(e) => e.error_code(),
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::Snapshot(_) => "INTERNAL_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// A journal entry with its transaction lines in creation order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryWithLines {
    /// The entry header.
    #[serde(flatten)]
    pub entry: journal_entries::Model,
    /// The entry's lines.
    pub transactions: Vec<transactions::Model>,
}

/// Filter options for listing journal entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct JournalEntryFilter {
    /// Filter by status.
    pub status: Option<JournalEntryStatus>,
    /// Filter by the adjusting flag.
    pub is_adjusting: Option<bool>,
}

/// Journal entry repository.
#[derive(Debug, Clone)]
pub struct JournalEntryRepository {
    db: DatabaseConnection,
}

impl JournalEntryRepository {
    /// Creates a new journal entry repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a pending journal entry with its lines.
    ///
    /// Managers are notified after commit; a failed notification is logged
    /// and does not fail the call.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The draft is incomplete or unbalanced
    /// - The creating user does not exist
    /// - Any referenced account is missing or inactive
    /// - The database operation fails
    pub async fn create_entry(
        &self,
        draft: JournalEntryDraft,
    ) -> Result<JournalEntryWithLines, JournalEntryError> {
        let entry = validate_draft(draft)?;

        let txn = self.db.begin().await?;

        if find_active_user(&txn, entry.created_by).await?.is_none() {
            return Err(JournalEntryError::UserNotFound(entry.created_by));
        }

        let ids: Vec<i32> = entry
            .account_ids()
            .into_iter()
            .map(AccountId::into_inner)
            .collect();
        let availability: HashMap<i32, bool> = accounts::Entity::find()
            .filter(accounts::Column::Id.is_in(ids))
            .all(&txn)
            .await?
            .into_iter()
            .map(|a| (a.id, a.is_active))
            .collect();
        ensure_accounts_postable(&entry, |id| match availability.get(&id.into_inner()) {
            Some(true) => AccountAvailability::Active,
            Some(false) => AccountAvailability::Inactive,
            None => AccountAvailability::Missing,
        })?;

        let pr = format_pr(next_pr_sequence(&txn).await?);
        let now = Utc::now();
        let created_by = entry.created_by;

        let header = journal_entries::ActiveModel {
            pr: Set(pr.clone()),
            description: Set(entry.description),
            date: Set(entry.date),
            status: Set(JournalEntryStatus::Pending.into()),
            comment: Set(None),
            is_adjusting: Set(entry.is_adjusting),
            user_id: Set(created_by.into_inner()),
            reviewed_by: Set(None),
            reviewed_at: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        record_event(
            &txn,
            AuditEvent::created(tables::JOURNAL_ENTRIES, header.id, &header, Some(created_by))?,
        )
        .await?;

        let mut lines = Vec::with_capacity(entry.lines.len());
        for line in entry.lines {
            let row = transactions::ActiveModel {
                account_id: Set(line.account_id.into_inner()),
                journal_entry_id: Set(Some(header.id)),
                entry_type: Set(line.entry_type.into()),
                amount: Set(line.amount),
                description: Set(line.description),
                date: Set(line.date),
                user_id: Set(Some(created_by.into_inner())),
                is_approved: Set(false),
                balance: Set(rust_decimal::Decimal::ZERO),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            record_event(
                &txn,
                AuditEvent::created(tables::TRANSACTIONS, row.id, &row, Some(created_by))?,
            )
            .await?;
            lines.push(row);
        }

        txn.commit().await?;

        info!(
            journal_entry_id = header.id,
            pr = %header.pr,
            lines = lines.len(),
            total = %entry.total,
            "Journal entry created"
        );

        let notifications = NotificationRepository::new(self.db.clone());
        match notifications
            .notify_managers(JournalEntryId::new(header.id), &pr)
            .await
        {
            Ok(sent) => info!(journal_entry_id = header.id, sent, "Managers notified"),
            Err(e) => warn!(
                journal_entry_id = header.id,
                error = %e,
                "Failed to notify managers about new journal entry"
            ),
        }

        Ok(JournalEntryWithLines {
            entry: header,
            transactions: lines,
        })
    }

    /// Approves a pending entry and posts its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The entry does not exist or is not pending
    /// - The reviewer does not exist
    /// - Posting fails (the whole approval is rolled back)
    pub async fn approve_entry(
        &self,
        id: JournalEntryId,
        reviewer: UserId,
    ) -> Result<JournalEntryWithLines, JournalEntryError> {
        let txn = self.db.begin().await?;

        let before = lock_entry(&txn, id).await?;
        let action = JournalWorkflow::approve(before.status.into(), reviewer)?;
        if find_active_user(&txn, reviewer).await?.is_none() {
            return Err(JournalEntryError::UserNotFound(reviewer));
        }

        let lines = transactions::Entity::find()
            .filter(transactions::Column::JournalEntryId.eq(before.id))
            .order_by_asc(transactions::Column::Id)
            .all(&txn)
            .await?;

        let mut account_ids: Vec<i32> = lines.iter().map(|l| l.account_id).collect();
        account_ids.sort_unstable();
        account_ids.dedup();
        let touched = accounts::Entity::find()
            .filter(accounts::Column::Id.is_in(account_ids))
            .order_by_asc(accounts::Column::Id)
            .lock_exclusive()
            .all(&txn)
            .await?;

        let mut ledger = touched.iter().fold(PostingLedger::new(), |ledger, account| {
            ledger.with_account(AccountId::new(account.id), account_state(account))
        });
        let posted = ledger.post_all(lines.iter().map(|line| PostingLine {
            transaction_id: TransactionId::new(line.id),
            account_id: AccountId::new(line.account_id),
            entry_type: line.entry_type.into(),
            amount: line.amount,
        }))?;

        let now = Utc::now();
        let after = apply_review(&txn, &before, &action).await?;

        let mut approved = Vec::with_capacity(lines.len());
        for (line, result) in lines.into_iter().zip(posted) {
            let mut active: transactions::ActiveModel = line.clone().into();
            active.is_approved = Set(true);
            active.balance = Set(result.balance);
            active.updated_at = Set(now.into());
            let updated = active.update(&txn).await?;
            record_event(
                &txn,
                AuditEvent::updated(
                    tables::TRANSACTIONS,
                    updated.id,
                    &line,
                    &updated,
                    Some(reviewer),
                )?,
            )
            .await?;
            approved.push(updated);
        }

        let states: HashMap<AccountId, AccountBalance> =
            ledger.into_accounts().into_iter().collect();
        for account in touched {
            let Some(state) = states.get(&AccountId::new(account.id)) else {
                continue;
            };
            let mut active: accounts::ActiveModel = account.clone().into();
            active.balance = Set(state.balance);
            active.total_debits = Set(state.total_debits);
            active.total_credits = Set(state.total_credits);
            active.updated_at = Set(now.into());
            let updated = active.update(&txn).await?;
            record_event(
                &txn,
                AuditEvent::updated(
                    tables::ACCOUNTS,
                    updated.id,
                    &account,
                    &updated,
                    Some(reviewer),
                )?,
            )
            .await?;
        }

        txn.commit().await?;

        info!(
            journal_entry_id = after.id,
            pr = %after.pr,
            reviewed_by = %reviewer,
            lines = approved.len(),
            "Journal entry approved and posted"
        );

        Ok(JournalEntryWithLines {
            entry: after,
            transactions: approved,
        })
    }

    /// Rejects a pending entry with a comment. Nothing is posted.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The comment is blank
    /// - The entry does not exist or is not pending
    /// - The reviewer does not exist
    pub async fn reject_entry(
        &self,
        id: JournalEntryId,
        reviewer: UserId,
        comment: &str,
    ) -> Result<JournalEntryWithLines, JournalEntryError> {
        JournalWorkflow::require_comment(comment)?;

        let txn = self.db.begin().await?;

        let before = lock_entry(&txn, id).await?;
        let action = JournalWorkflow::reject(before.status.into(), reviewer, comment)?;
        if find_active_user(&txn, reviewer).await?.is_none() {
            return Err(JournalEntryError::UserNotFound(reviewer));
        }

        let after = apply_review(&txn, &before, &action).await?;
        let lines = lines_of(&txn, after.id).await?;

        txn.commit().await?;

        info!(
            journal_entry_id = after.id,
            pr = %after.pr,
            reviewed_by = %reviewer,
            "Journal entry rejected"
        );

        Ok(JournalEntryWithLines {
            entry: after,
            transactions: lines,
        })
    }

    /// Gets one entry with its lines.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::NotFound`] if it does not exist.
    pub async fn find_entry(
        &self,
        id: JournalEntryId,
    ) -> Result<JournalEntryWithLines, JournalEntryError> {
        let entry = journal_entries::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(JournalError::NotFound(id))?;
        let transactions = lines_of(&self.db, entry.id).await?;
        Ok(JournalEntryWithLines {
            entry,
            transactions,
        })
    }

    /// Lists entries newest first, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_entries(
        &self,
        filter: JournalEntryFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<JournalEntryWithLines>, JournalEntryError> {
        let mut query = journal_entries::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(
                journal_entries::Column::Status
                    .eq(crate::entities::sea_orm_active_enums::JournalEntryStatus::from(status)),
            );
        }
        if let Some(is_adjusting) = filter.is_adjusting {
            query = query.filter(journal_entries::Column::IsAdjusting.eq(is_adjusting));
        }

        let paginator = query
            .order_by_desc(journal_entries::Column::Date)
            .order_by_desc(journal_entries::Column::Id)
            .paginate(&self.db, page.limit());
        let total = paginator.num_items().await?;
        let entries = paginator.fetch_page(page.page_index()).await?;

        let ids: Vec<i32> = entries.iter().map(|e| e.id).collect();
        let mut by_entry: HashMap<i32, Vec<transactions::Model>> = HashMap::new();
        for line in transactions::Entity::find()
            .filter(transactions::Column::JournalEntryId.is_in(ids))
            .order_by_asc(transactions::Column::Id)
            .all(&self.db)
            .await?
        {
            if let Some(entry_id) = line.journal_entry_id {
                by_entry.entry(entry_id).or_default().push(line);
            }
        }

        let data = entries
            .into_iter()
            .map(|entry| JournalEntryWithLines {
                transactions: by_entry.remove(&entry.id).unwrap_or_default(),
                entry,
            })
            .collect();

        Ok(PageResponse::new(
            data,
            page.page.max(1),
            u32::try_from(page.limit()).unwrap_or(PageRequest::MAX_PER_PAGE),
            total,
        ))
    }
}

/// Stored balance state of an account row.
pub(crate) fn account_state(account: &accounts::Model) -> AccountBalance {
    AccountBalance {
        normal_side: account.normal_side.into(),
        balance: account.balance,
        total_debits: account.total_debits,
        total_credits: account.total_credits,
    }
}

async fn next_pr_sequence<C: ConnectionTrait>(conn: &C) -> Result<i64, DbErr> {
    let row = conn
        .query_one(Statement::from_string(
            conn.get_database_backend(),
            "SELECT nextval('journal_entry_pr_seq') AS seq",
        ))
        .await?
        .ok_or_else(|| DbErr::RecordNotFound("journal_entry_pr_seq".to_string()))?;
    row.try_get("", "seq")
}

async fn lock_entry<C: ConnectionTrait>(
    conn: &C,
    id: JournalEntryId,
) -> Result<journal_entries::Model, JournalEntryError> {
    Ok(journal_entries::Entity::find_by_id(id.into_inner())
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or(JournalError::NotFound(id))?)
}

async fn lines_of<C: ConnectionTrait>(
    conn: &C,
    entry_id: i32,
) -> Result<Vec<transactions::Model>, DbErr> {
    transactions::Entity::find()
        .filter(transactions::Column::JournalEntryId.eq(entry_id))
        .order_by_asc(transactions::Column::Id)
        .all(conn)
        .await
}

/// Writes the review decision onto the entry and records the UPDATE event.
async fn apply_review<C: ConnectionTrait>(
    conn: &C,
    before: &journal_entries::Model,
    action: &ReviewAction,
) -> Result<journal_entries::Model, JournalEntryError> {
    let mut active: journal_entries::ActiveModel = before.clone().into();
    active.status = Set(action.new_status().into());
    active.reviewed_by = Set(Some(action.reviewed_by().into_inner()));
    match action {
        ReviewAction::Approve { reviewed_at, .. } => {
            active.reviewed_at = Set(Some((*reviewed_at).into()));
            active.updated_at = Set((*reviewed_at).into());
        }
        ReviewAction::Reject {
            reviewed_at,
            comment,
            ..
        } => {
            active.comment = Set(Some(comment.clone()));
            active.reviewed_at = Set(Some((*reviewed_at).into()));
            active.updated_at = Set((*reviewed_at).into());
        }
    }
    let after = active.update(conn).await?;
    record_event(
        conn,
        AuditEvent::updated(
            tables::JOURNAL_ENTRIES,
            after.id,
            before,
            &after,
            Some(action.reviewed_by()),
        )?,
    )
    .await?;
    Ok(after)
}
