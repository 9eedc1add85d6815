//! Chart of accounts routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use validator::Validate;

use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, ApiQuery, parse_id},
};
use tally_core::audit::tables;
use tally_core::ledger::NormalSide;
use tally_core::reports::DateRange;
use tally_db::repositories::{
    AccountFilter, AccountRepository, CreateAccountInput, EventLogRepository, UpdateAccountInput,
};
use tally_shared::types::{AccountId, CategoryId, OrderId, StatementId, SubcategoryId, UserId};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts))
        .route("/accounts/new", post(create_account))
        .route("/accounts/{id}", get(get_account))
        .route("/accounts/{id}/edit", post(update_account))
        .route("/accounts/{id}/ledger", get(get_account_ledger))
        .route("/accounts/{id}/events", get(get_account_events))
}

/// Query parameters for listing accounts.
#[derive(Debug, Default, Deserialize)]
pub struct ListAccountsQuery {
    /// Filter by active status.
    pub active: Option<bool>,
}

/// Request body for creating an account.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    /// Unique account name.
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// "Debit" or "Credit".
    pub normal_side: String,
    /// Category id.
    pub category_id: CategoryId,
    /// Optional subcategory id.
    pub subcategory_id: Option<SubcategoryId>,
    /// Opening balance, default zero.
    #[serde(default)]
    pub initial_balance: Decimal,
    /// Display order slot.
    pub order_id: OrderId,
    /// Statement group.
    pub statement_id: StatementId,
    /// Optional comment.
    pub comment: Option<String>,
    /// Creating user.
    pub user_id: Option<UserId>,
}

/// Request body for editing an account. Absent fields are unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    /// New name.
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New normal side.
    pub normal_side: Option<String>,
    /// New category.
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
    /// Editing user.
    pub user_id: Option<UserId>,
}

/// Query parameters for an account ledger.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerQuery {
    /// First included date.
    pub start_date: Option<NaiveDate>,
    /// Last included date.
    pub end_date: Option<NaiveDate>,
}

fn parse_normal_side(raw: &str) -> Result<NormalSide, ApiError> {
    NormalSide::parse(raw).ok_or_else(|| {
        ApiError::bad_request(
            "INVALID_NORMAL_SIDE",
            format!("Invalid normal side '{raw}'. Must be Debit or Credit"),
        )
    })
}

/// GET `/accounts` - List accounts.
async fn list_accounts(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListAccountsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = AccountRepository::new((*state.db).clone());
    let accounts = repo
        .list_accounts(AccountFilter {
            is_active: query.active,
        })
        .await?;
    Ok(Json(accounts))
}

/// POST `/accounts/new` - Create an account.
async fn create_account(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;
    let normal_side = parse_normal_side(&payload.normal_side)?;

    let repo = AccountRepository::new((*state.db).clone());
    let created = repo
        .create_account(CreateAccountInput {
            name: payload.name,
            description: payload.description,
            normal_side,
            category_id: payload.category_id,
            subcategory_id: payload.subcategory_id,
            statement_id: payload.statement_id,
            order_id: payload.order_id,
            comment: payload.comment,
            initial_balance: payload.initial_balance,
            user_id: payload.user_id,
        })
        .await?;

    info!(
        account_id = created.account.id,
        number = %created.account.number,
        "Account created via API"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "account": created.account,
            "transactions": created.transactions,
        })),
    ))
}

/// GET `/accounts/{id}` - Get one account.
async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: AccountId = parse_id(&id)?;
    let repo = AccountRepository::new((*state.db).clone());
    Ok(Json(repo.find_account(id).await?))
}

/// POST `/accounts/{id}/edit` - Edit an account.
async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id: AccountId = parse_id(&id)?;
    payload.validate()?;
    let normal_side = payload
        .normal_side
        .as_deref()
        .map(parse_normal_side)
        .transpose()?;

    let repo = AccountRepository::new((*state.db).clone());
    let account = repo
        .update_account(
            id,
            UpdateAccountInput {
                name: payload.name,
                description: payload.description,
                normal_side,
                category_id: payload.category_id,
                subcategory_id: payload.subcategory_id,
                statement_id: payload.statement_id,
                order_id: payload.order_id,
                comment: payload.comment,
                is_active: payload.is_active,
            },
            payload.user_id,
        )
        .await?;

    Ok(Json(json!({ "account": account })))
}

/// GET `/accounts/{id}/ledger` - Posted transactions with running balances.
async fn get_account_ledger(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<LedgerQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let id: AccountId = parse_id(&id)?;
    let range = DateRange::new(query.start_date, query.end_date)?;

    let repo = AccountRepository::new((*state.db).clone());
    Ok(Json(repo.account_ledger(id, range).await?))
}

/// GET `/accounts/{id}/events` - Audit trail of one account.
async fn get_account_events(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: AccountId = parse_id(&id)?;
    let accounts = AccountRepository::new((*state.db).clone());
    accounts.find_account(id).await?;

    let events = EventLogRepository::new((*state.db).clone());
    Ok(Json(
        events
            .list_for_record(tables::ACCOUNTS, id.into_inner())
            .await?,
    ))
}
