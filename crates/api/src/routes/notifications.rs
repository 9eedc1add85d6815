//! Manager notification routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, patch},
};
use serde::Deserialize;

use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiQuery, parse_id},
};
use tally_db::repositories::NotificationRepository;
use tally_shared::types::{NotificationId, UserId};

/// Creates the notification routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/{id}/read", patch(mark_read))
}

/// Query parameters for listing notifications.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    /// Recipient.
    pub user_id: UserId,
    /// Only unread notifications.
    #[serde(default)]
    pub unread: bool,
}

/// GET `/notifications?userId` - A user's notifications, newest first.
async fn list_notifications(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<NotificationQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = NotificationRepository::new((*state.db).clone());
    Ok(Json(repo.list_for_user(query.user_id, query.unread).await?))
}

/// PATCH `/notifications/{id}/read` - Mark one notification read.
async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: NotificationId = parse_id(&id)?;
    let repo = NotificationRepository::new((*state.db).clone());
    let notification = repo.mark_read(id).await?.ok_or_else(|| {
        ApiError::not_found(
            "NOTIFICATION_NOT_FOUND",
            format!("Notification not found: {id}"),
        )
    })?;
    Ok(Json(notification))
}
