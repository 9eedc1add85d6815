//! Journal entry routes: creation, listing and review.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde::Deserialize;
use tracing::info;

use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, ApiQuery},
    middleware::CurrentActor,
};
use tally_core::journal::{JournalEntryDraft, JournalEntryStatus, JournalError, JournalWorkflow};
use tally_core::policy::{Capability, authorize};
use tally_db::repositories::{JournalEntryFilter, JournalEntryRepository};
use tally_shared::types::{JournalEntryId, PageRequest};

/// Creates the journal entry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/journal-entries", get(list_entries))
        .route("/journal-entries/new", post(create_entry))
        .route("/journal-entries/{id}", get(get_entry))
        .route("/journal-entries/{id}/approve", patch(approve_entry))
        .route("/journal-entries/{id}/reject", patch(reject_entry))
}

/// Query parameters for listing journal entries.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntriesQuery {
    /// PENDING, APPROVED or REJECTED.
    pub status: Option<String>,
    /// Filter by the adjusting flag.
    pub is_adjusting: Option<bool>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// Request body for rejecting an entry.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectRequest {
    /// Required reason.
    pub comment: Option<String>,
}

fn parse_entry_id(raw: &str) -> Result<JournalEntryId, JournalError> {
    raw.parse()
        .ok()
        .filter(|id: &JournalEntryId| id.into_inner() > 0)
        .ok_or_else(|| JournalError::InvalidId(raw.to_string()))
}

fn parse_status(raw: &str) -> Result<JournalEntryStatus, ApiError> {
    JournalEntryStatus::parse(raw).ok_or_else(|| {
        ApiError::bad_request(
            "INVALID_STATUS",
            format!("Invalid status '{raw}'. Must be PENDING, APPROVED or REJECTED"),
        )
    })
}

/// POST `/journal-entries/new` - Create a pending entry.
async fn create_entry(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<JournalEntryDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = JournalEntryRepository::new((*state.db).clone());
    let created = repo.create_entry(draft).await?;

    info!(
        journal_entry_id = created.entry.id,
        pr = %created.entry.pr,
        "Journal entry submitted for review"
    );

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET `/journal-entries` - List entries, newest first.
async fn list_entries(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListEntriesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let status = query.status.as_deref().map(parse_status).transpose()?;
    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };

    let repo = JournalEntryRepository::new((*state.db).clone());
    let entries = repo
        .list_entries(
            JournalEntryFilter {
                status,
                is_adjusting: query.is_adjusting,
            },
            &page,
        )
        .await?;
    Ok(Json(entries))
}

/// GET `/journal-entries/{id}` - One entry with its lines.
async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_entry_id(&id)?;
    let repo = JournalEntryRepository::new((*state.db).clone());
    Ok(Json(repo.find_entry(id).await?))
}

/// PATCH `/journal-entries/{id}/approve` - Approve and post.
async fn approve_entry(
    State(state): State<AppState>,
    actor: Result<CurrentActor, ApiError>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_entry_id(&id)?;
    let CurrentActor(actor) = actor?;
    authorize(&actor, Capability::ApproveEntries)?;

    let repo = JournalEntryRepository::new((*state.db).clone());
    let approved = repo.approve_entry(id, actor.user_id).await?;
    Ok(Json(approved))
}

/// PATCH `/journal-entries/{id}/reject` - Reject with a comment.
async fn reject_entry(
    State(state): State<AppState>,
    actor: Result<CurrentActor, ApiError>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<RejectRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_entry_id(&id)?;
    let CurrentActor(actor) = actor?;
    authorize(&actor, Capability::RejectEntries)?;
    let comment = JournalWorkflow::require_comment(payload.comment.as_deref().unwrap_or_default())?;

    let repo = JournalEntryRepository::new((*state.db).clone());
    let rejected = repo.reject_entry(id, actor.user_id, &comment).await?;
    Ok(Json(rejected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("12", true)]
    #[case("0", false)]
    #[case("-3", false)]
    #[case("abc", false)]
    fn test_parse_entry_id(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(parse_entry_id(raw).is_ok(), ok);
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("pending").unwrap(), JournalEntryStatus::Pending);
        assert!(parse_status("DONE").is_err());
    }
}
