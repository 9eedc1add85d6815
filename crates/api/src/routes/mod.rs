//! API route definitions.
//!
//! The fronting auth layer authenticates callers; review routes read the
//! caller from its identity headers (see [`crate::middleware::actor`]).

use axum::Router;

use crate::AppState;

pub mod accounts;
pub mod health;
pub mod journal_entries;
pub mod lookups;
pub mod notifications;
pub mod reports;
pub mod transactions;

#[cfg(test)]
mod tests;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(accounts::routes())
        .merge(journal_entries::routes())
        .merge(transactions::routes())
        .merge(reports::routes())
        .merge(lookups::routes())
        .merge(notifications::routes())
}
