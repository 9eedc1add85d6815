//! Reference data routes used to build account forms.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use serde::Deserialize;

use crate::{AppState, error::ApiError, extractors::ApiQuery};
use tally_db::repositories::LookupRepository;
use tally_shared::types::CategoryId;

/// Creates the lookup routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/subcategories", get(list_subcategories))
        .route("/statements", get(list_statements))
        .route("/orders", get(list_orders))
}

/// Query parameters for listing subcategories.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryQuery {
    /// Only subcategories of this category.
    pub category_id: Option<CategoryId>,
}

async fn list_categories(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let repo = LookupRepository::new((*state.db).clone());
    Ok(Json(repo.list_categories().await?))
}

async fn list_subcategories(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SubcategoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = LookupRepository::new((*state.db).clone());
    Ok(Json(repo.list_subcategories(query.category_id).await?))
}

async fn list_statements(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let repo = LookupRepository::new((*state.db).clone());
    Ok(Json(repo.list_statements().await?))
}

async fn list_orders(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let repo = LookupRepository::new((*state.db).clone());
    Ok(Json(repo.list_orders().await?))
}
