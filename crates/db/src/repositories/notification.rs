//! Notification repository for manager review requests.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tally_core::journal::approval_request_message;
use tally_shared::types::{JournalEntryId, NotificationId, UserId};

use crate::entities::{notifications, sea_orm_active_enums::UserRole, users};

/// Notification repository.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    db: DatabaseConnection,
}

impl NotificationRepository {
    /// Creates a new notification repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Sends an unread notification about `pr` to every active manager.
    ///
    /// Returns the number of notifications written.
    ///
    /// # Errors
    ///
    /// Returns an error if the manager lookup or any insert fails.
    pub async fn notify_managers(
        &self,
        journal_entry_id: JournalEntryId,
        pr: &str,
    ) -> Result<usize, DbErr> {
        let managers = users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::Manager))
            .filter(users::Column::IsActive.eq(true))
            .all(&self.db)
            .await?;

        if managers.is_empty() {
            return Ok(0);
        }

        let now = Utc::now();
        let message = approval_request_message(pr);
        let rows = managers.iter().map(|m| notifications::ActiveModel {
            user_id: Set(m.id),
            journal_entry_id: Set(Some(journal_entry_id.into_inner())),
            message: Set(message.clone()),
            is_read: Set(false),
            created_at: Set(now.into()),
            ..Default::default()
        });
        notifications::Entity::insert_many(rows)
            .exec_without_returning(&self.db)
            .await?;

        Ok(managers.len())
    }

    /// Lists a user's notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
        unread_only: bool,
    ) -> Result<Vec<notifications::Model>, DbErr> {
        let mut query = notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id.into_inner()));
        if unread_only {
            query = query.filter(notifications::Column::IsRead.eq(false));
        }
        query
            .order_by_desc(notifications::Column::CreatedAt)
            .order_by_desc(notifications::Column::Id)
            .all(&self.db)
            .await
    }

    /// Marks a notification as read. Returns `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn mark_read(
        &self,
        id: NotificationId,
    ) -> Result<Option<notifications::Model>, DbErr> {
        let Some(row) = notifications::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };
        if row.is_read {
            return Ok(Some(row));
        }
        let mut active: notifications::ActiveModel = row.into();
        active.is_read = Set(true);
        active.update(&self.db).await.map(Some)
    }
}
