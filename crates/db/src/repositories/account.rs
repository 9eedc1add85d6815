//! Account repository for chart of accounts database operations.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
    sea_query::OnConflict,
};
use tracing::info;

use tally_core::accounts::{
    AccountClass, AccountRuleError, ensure_can_deactivate, format_account_number,
    highest_in_class, next_account_number, seed_line, validate_new_account,
};
use tally_core::audit::{AuditEvent, tables};
use tally_core::ledger::{AccountBalance, NormalSide};
use tally_core::reports::DateRange;
use tally_shared::types::{AccountId, CategoryId, OrderId, StatementId, SubcategoryId, UserId};

use super::event_log::record_event;
use super::lookup::find_active_user;
use crate::entities::{
    account_number_sequences, account_orders, accounts, categories, statements, subcategories,
    transactions,
};

/// Unique constraint on `accounts.name`.
const NAME_CONSTRAINT: &str = "uq_accounts_name";

/// Description stored on the synthesized opening-balance transaction.
pub const OPENING_BALANCE_DESCRIPTION: &str = "Initial balance";

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Another account already uses the name.
    #[error("An account named '{0}' already exists")]
    DuplicateName(String),

    /// Category does not exist.
    #[error("Category not found: {0}")]
    CategoryNotFound(CategoryId),

    /// Subcategory missing or under a different category.
    #[error("Subcategory {subcategory_id} does not belong to category {category_id}")]
    SubcategoryMismatch {
        /// Requested subcategory.
        subcategory_id: SubcategoryId,
        /// Category it was checked against.
        category_id: CategoryId,
    },

    /// Statement does not exist.
    #[error("Statement not found: {0}")]
    StatementNotFound(StatementId),

    /// Display order does not exist.
    #[error("Display order not found: {0}")]
    OrderNotFound(OrderId),

    /// Acting user does not exist or is inactive.
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// Account not found.
    #[error("Account not found: {0}")]
    NotFound(AccountId),

    /// Normal side cannot change once the account has transactions.
    #[error("Cannot change the normal side of an account with {0} transactions")]
    NormalSideLocked(u64),

    /// Registry rule violation.
    #[error(transparent)]
    Rule(#[from] AccountRuleError),

    /// Audit snapshot could not be serialized.
    #[error("Failed to serialize audit snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl AccountError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::DuplicateName(_) => 409,
            Self::CategoryNotFound(_) | Self::NotFound(_) => 404,
            Self::SubcategoryMismatch { .. }
            | Self::StatementNotFound(_)
            | Self::OrderNotFound(_)
            | Self::UserNotFound(_)
            | Self::NormalSideLocked(_) => 400,
            Self::Rule(e) => e.status_code(),
            Self::Snapshot(_) | Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateName(_) => "DUPLICATE_ACCOUNT_NAME",
            Self::CategoryNotFound(_) => "CATEGORY_NOT_FOUND",
            Self::SubcategoryMismatch { .. } => "SUBCATEGORY_MISMATCH",
            Self::StatementNotFound(_) => "STATEMENT_NOT_FOUND",
            Self::OrderNotFound(_) => "ORDER_NOT_FOUND",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::NotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::NormalSideLocked(_) => "NORMAL_SIDE_LOCKED",
            Self::Rule(e) => e.error_code(),
            Self::Snapshot(_) => "INTERNAL_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Unique account name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Side on which the balance increases.
    pub normal_side: NormalSide,
    /// Category, which also fixes the number prefix.
    pub category_id: CategoryId,
    /// Optional subcategory under the category.
    pub subcategory_id: Option<SubcategoryId>,
    /// Statement group.
    pub statement_id: StatementId,
    /// Display order slot.
    pub order_id: OrderId,
    /// Optional comment.
    pub comment: Option<String>,
    /// Opening balance, seeded as a transaction when positive.
    pub initial_balance: Decimal,
    /// Creating user.
    pub user_id: Option<UserId>,
}

/// Input for editing an account. Absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New normal side.
    pub normal_side: Option<NormalSide>,
    /// New category; triggers renumbering.
    pub category_id: Option<CategoryId>,
    /// New subcategory.
    pub subcategory_id: Option<SubcategoryId>,
    /// New statement group.
    pub statement_id: Option<StatementId>,
    /// New display order slot.
    pub order_id: Option<OrderId>,
    /// New comment.
    pub comment: Option<String>,
    /// Activate or deactivate.
    pub is_active: Option<bool>,
}

/// Filter options for listing accounts.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountFilter {
    /// Filter by active status.
    pub is_active: Option<bool>,
}

/// A newly created account together with its opening-balance transaction.
#[derive(Debug, Clone)]
pub struct CreatedAccount {
    /// The account record.
    pub account: accounts::Model,
    /// Zero or one seed transaction.
    pub transactions: Vec<transactions::Model>,
}

/// Account repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists accounts ordered by number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_accounts(
        &self,
        filter: AccountFilter,
    ) -> Result<Vec<accounts::Model>, AccountError> {
        let mut query = accounts::Entity::find();
        if let Some(is_active) = filter.is_active {
            query = query.filter(accounts::Column::IsActive.eq(is_active));
        }
        Ok(query
            .order_by_asc(accounts::Column::Number)
            .all(&self.db)
            .await?)
    }

    /// Gets one account.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::NotFound`] if it does not exist.
    pub async fn find_account(&self, id: AccountId) -> Result<accounts::Model, AccountError> {
        accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(id))
    }

    /// Creates an account, numbering it from its category and seeding the
    /// opening balance when it is positive.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The name is blank, taken, or the opening balance is negative
    /// - The category, subcategory, statement, order or user is invalid
    /// - The database operation fails
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<CreatedAccount, AccountError> {
        validate_new_account(&input.name, input.initial_balance)?;
        let name = input.name.trim().to_string();

        let txn = self.db.begin().await?;

        ensure_name_free(&txn, &name, None).await?;
        let class = resolve_class(&txn, input.category_id, input.subcategory_id).await?;
        ensure_statement(&txn, input.statement_id).await?;
        ensure_order(&txn, input.order_id).await?;
        if let Some(user_id) = input.user_id
            && find_active_user(&txn, user_id).await?.is_none()
        {
            return Err(AccountError::UserNotFound(user_id));
        }

        let number = allocate_number(&txn, class).await?;
        let seed = seed_line(input.normal_side, input.initial_balance);
        let mut state = AccountBalance::new(input.normal_side);
        if let Some(seed) = seed {
            state.apply(seed.entry_type, seed.amount);
        }

        let now = Utc::now();
        let user_id = input.user_id.map(UserId::into_inner);
        let account = accounts::ActiveModel {
            number: Set(number),
            name: Set(name.clone()),
            description: Set(input.description.trim().to_string()),
            normal_side: Set(input.normal_side.into()),
            category_id: Set(input.category_id.into_inner()),
            subcategory_id: Set(input.subcategory_id.map(SubcategoryId::into_inner)),
            statement_id: Set(input.statement_id.into_inner()),
            order_id: Set(input.order_id.into_inner()),
            comment: Set(input.comment),
            is_active: Set(true),
            initial_balance: Set(input.initial_balance),
            balance: Set(state.balance),
            total_debits: Set(state.total_debits),
            total_credits: Set(state.total_credits),
            user_id: Set(user_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| name_conflict(e, &name))?;
        record_event(
            &txn,
            AuditEvent::created(tables::ACCOUNTS, account.id, &account, input.user_id)?,
        )
        .await?;

        let mut seeded = Vec::new();
        if let Some(seed) = seed {
            let row = transactions::ActiveModel {
                account_id: Set(account.id),
                journal_entry_id: Set(None),
                entry_type: Set(seed.entry_type.into()),
                amount: Set(seed.amount),
                description: Set(OPENING_BALANCE_DESCRIPTION.to_string()),
                date: Set(now.date_naive()),
                user_id: Set(user_id),
                is_approved: Set(true),
                balance: Set(seed.balance),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            record_event(
                &txn,
                AuditEvent::created(tables::TRANSACTIONS, row.id, &row, input.user_id)?,
            )
            .await?;
            seeded.push(row);
        }

        txn.commit().await?;

        info!(
            account_id = account.id,
            number = %account.number,
            seeded = !seeded.is_empty(),
            "Account created"
        );

        Ok(CreatedAccount {
            account,
            transactions: seeded,
        })
    }

    /// Edits an account.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The account does not exist
    /// - Deactivation is requested while the balance is nonzero
    /// - The new name is taken by another account
    /// - A referenced category, subcategory, statement or order is invalid
    /// - The database operation fails
    pub async fn update_account(
        &self,
        id: AccountId,
        input: UpdateAccountInput,
        user_id: Option<UserId>,
    ) -> Result<accounts::Model, AccountError> {
        let txn = self.db.begin().await?;

        let before = accounts::Entity::find_by_id(id.into_inner())
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(AccountError::NotFound(id))?;

        if input.is_active == Some(false) {
            ensure_can_deactivate(before.balance)?;
        }

        let mut active: accounts::ActiveModel = before.clone().into();
        let mut requested_name = before.name.clone();

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AccountRuleError::BlankName.into());
            }
            if name != before.name {
                ensure_name_free(&txn, &name, Some(id)).await?;
                requested_name.clone_from(&name);
                active.name = Set(name);
            }
        }

        let category_id = input
            .category_id
            .unwrap_or(CategoryId::new(before.category_id));
        let category_changed = category_id.into_inner() != before.category_id;
        let subcategory_id = input
            .subcategory_id
            .or(before.subcategory_id.map(SubcategoryId::new));
        if category_changed || input.subcategory_id.is_some() {
            let class = resolve_class(&txn, category_id, subcategory_id).await?;
            if category_changed {
                active.number = Set(allocate_number(&txn, class).await?);
                active.category_id = Set(category_id.into_inner());
            }
            active.subcategory_id = Set(subcategory_id.map(SubcategoryId::into_inner));
        }

        if let Some(side) = input.normal_side {
            let side = crate::entities::sea_orm_active_enums::NormalSide::from(side);
            if side != before.normal_side {
                let count = transactions::Entity::find()
                    .filter(transactions::Column::AccountId.eq(before.id))
                    .count(&txn)
                    .await?;
                if count > 0 {
                    return Err(AccountError::NormalSideLocked(count));
                }
                active.normal_side = Set(side);
            }
        }
        if let Some(statement_id) = input.statement_id {
            ensure_statement(&txn, statement_id).await?;
            active.statement_id = Set(statement_id.into_inner());
        }
        if let Some(order_id) = input.order_id {
            ensure_order(&txn, order_id).await?;
            active.order_id = Set(order_id.into_inner());
        }
        if let Some(description) = input.description {
            active.description = Set(description.trim().to_string());
        }
        if let Some(comment) = input.comment {
            active.comment = Set(Some(comment));
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().into());

        let after = active
            .update(&txn)
            .await
            .map_err(|e| name_conflict(e, &requested_name))?;
        record_event(
            &txn,
            AuditEvent::updated(tables::ACCOUNTS, after.id, &before, &after, user_id)?,
        )
        .await?;

        txn.commit().await?;

        info!(
            account_id = after.id,
            number = %after.number,
            is_active = after.is_active,
            "Account updated"
        );

        Ok(after)
    }

    /// Lists an account's approved transactions in ledger order with their
    /// running balance snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::NotFound`] if the account does not exist.
    pub async fn account_ledger(
        &self,
        id: AccountId,
        range: DateRange,
    ) -> Result<Vec<transactions::Model>, AccountError> {
        self.find_account(id).await?;

        let mut query = transactions::Entity::find()
            .filter(transactions::Column::AccountId.eq(id.into_inner()))
            .filter(transactions::Column::IsApproved.eq(true));
        if let Some(start) = range.start_date {
            query = query.filter(transactions::Column::Date.gte(start));
        }
        if let Some(end) = range.end_date {
            query = query.filter(transactions::Column::Date.lte(end));
        }
        Ok(query
            .order_by_asc(transactions::Column::Date)
            .order_by_asc(transactions::Column::Id)
            .all(&self.db)
            .await?)
    }
}

/// Maps a lost race on the account-name constraint to a duplicate-name error.
fn name_conflict(err: DbErr, name: &str) -> AccountError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) if message.contains(NAME_CONSTRAINT) => {
            AccountError::DuplicateName(name.to_string())
        }
        _ => AccountError::Database(err),
    }
}

async fn ensure_name_free<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    except: Option<AccountId>,
) -> Result<(), AccountError> {
    let mut query = accounts::Entity::find().filter(accounts::Column::Name.eq(name));
    if let Some(except) = except {
        query = query.filter(accounts::Column::Id.ne(except.into_inner()));
    }
    if query.one(conn).await?.is_some() {
        return Err(AccountError::DuplicateName(name.to_string()));
    }
    Ok(())
}

/// Loads the category (and subcategory) and maps them to an account class.
///
/// The category name is tried first, then the subcategory name.
async fn resolve_class<C: ConnectionTrait>(
    conn: &C,
    category_id: CategoryId,
    subcategory_id: Option<SubcategoryId>,
) -> Result<AccountClass, AccountError> {
    let category = categories::Entity::find_by_id(category_id.into_inner())
        .one(conn)
        .await?
        .ok_or(AccountError::CategoryNotFound(category_id))?;

    let subcategory = match subcategory_id {
        Some(sub_id) => {
            let sub = subcategories::Entity::find_by_id(sub_id.into_inner())
                .one(conn)
                .await?
                .filter(|s| s.category_id == category.id)
                .ok_or(AccountError::SubcategoryMismatch {
                    subcategory_id: sub_id,
                    category_id,
                })?;
            Some(sub)
        }
        None => None,
    };

    match AccountClass::from_category_name(&category.name) {
        Ok(class) => Ok(class),
        Err(err) => subcategory
            .and_then(|s| AccountClass::from_category_name(&s.name).ok())
            .ok_or(AccountError::Rule(err)),
    }
}

async fn ensure_statement<C: ConnectionTrait>(
    conn: &C,
    id: StatementId,
) -> Result<(), AccountError> {
    statements::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?
        .map(|_| ())
        .ok_or(AccountError::StatementNotFound(id))
}

async fn ensure_order<C: ConnectionTrait>(conn: &C, id: OrderId) -> Result<(), AccountError> {
    account_orders::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?
        .map(|_| ())
        .ok_or(AccountError::OrderNotFound(id))
}

/// Draws the next account number for `class`.
///
/// The per-category counter row is locked for the rest of the caller's
/// transaction, so concurrent creations in one category queue up. Numbers
/// entered by hand above the counter are respected.
async fn allocate_number<C: ConnectionTrait>(
    conn: &C,
    class: AccountClass,
) -> Result<String, AccountError> {
    let prefix = class.prefix();
    let now = Utc::now();

    account_number_sequences::Entity::insert(account_number_sequences::ActiveModel {
        category_prefix: Set(prefix),
        last_number: Set(None),
        updated_at: Set(now.into()),
    })
    .on_conflict(
        OnConflict::column(account_number_sequences::Column::CategoryPrefix)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(conn)
    .await?;

    let counter = account_number_sequences::Entity::find_by_id(prefix)
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("account number counter {prefix}")))?;

    let existing: Vec<String> = accounts::Entity::find()
        .select_only()
        .column(accounts::Column::Number)
        .filter(accounts::Column::Number.starts_with(class.leading_digit().to_string()))
        .into_tuple()
        .all(conn)
        .await?;
    let highest = highest_in_class(class, existing.iter().map(String::as_str));

    let next = next_account_number(class, counter.last_number.max(highest))?;

    let mut active: account_number_sequences::ActiveModel = counter.into();
    active.last_number = Set(Some(next));
    active.updated_at = Set(now.into());
    active.update(conn).await?;

    Ok(format_account_number(next))
}
