//! Ledger transaction routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, patch},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, ApiQuery, parse_id},
};
use tally_core::journal::{JournalError, TransactionEdit, ensure_valid_amount};
use tally_db::repositories::{TransactionFilter, TransactionRepository};
use tally_shared::types::{AccountId, TransactionId, UserId};

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions))
        .route("/transactions/{id}", patch(update_transaction))
}

/// Query parameters for listing transactions.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsQuery {
    /// Only lines on this account.
    pub account_id: Option<AccountId>,
    /// Filter by posted state.
    pub approved: Option<bool>,
}

/// Request body for editing a transaction.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionRequest {
    /// New description.
    pub description: Option<String>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New ledger date.
    pub date: Option<NaiveDate>,
    /// Editing user.
    pub user_id: Option<UserId>,
}

/// GET `/transactions` - List transactions in ledger order.
async fn list_transactions(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListTransactionsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = TransactionRepository::new((*state.db).clone());
    let rows = repo
        .list_transactions(TransactionFilter {
            account_id: query.account_id,
            is_approved: query.approved,
        })
        .await?;
    Ok(Json(rows))
}

/// PATCH `/transactions/{id}` - Edit description, amount or date.
async fn update_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateTransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id: TransactionId = parse_id(&id)?;
    let edit = TransactionEdit {
        description: payload.description,
        amount: payload.amount,
        date: payload.date,
    };
    if edit.is_empty() {
        return Err(JournalError::EmptyEdit.into());
    }
    if let Some(amount) = edit.amount {
        ensure_valid_amount(amount)?;
    }

    let repo = TransactionRepository::new((*state.db).clone());
    let updated = repo.update_transaction(id, edit, payload.user_id).await?;
    Ok(Json(updated))
}
