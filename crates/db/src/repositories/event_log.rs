//! Event log repository.
//!
//! Audit records are appended inside the caller's database transaction so a
//! mutation and its audit trail commit or roll back together.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use tally_core::audit::AuditEvent;

use crate::entities::event_logs;

/// Appends one audit record.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub async fn record_event<C: ConnectionTrait>(
    conn: &C,
    event: AuditEvent,
) -> Result<event_logs::Model, DbErr> {
    event_logs::ActiveModel {
        event_type: Set(event.event_type.into()),
        table_name: Set(event.table_name.to_string()),
        record_id: Set(event.record_id),
        before_state: Set(event.before),
        after_state: Set(event.after),
        user_id: Set(event.user_id.map(|u| u.into_inner())),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(conn)
    .await
}

/// Read access to the audit log.
#[derive(Debug, Clone)]
pub struct EventLogRepository {
    db: DatabaseConnection,
}

impl EventLogRepository {
    /// Creates a new event log repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the events recorded for one row, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_for_record(
        &self,
        table_name: &str,
        record_id: i32,
    ) -> Result<Vec<event_logs::Model>, DbErr> {
        event_logs::Entity::find()
            .filter(event_logs::Column::TableName.eq(table_name))
            .filter(event_logs::Column::RecordId.eq(record_id))
            .order_by_asc(event_logs::Column::CreatedAt)
            .order_by_asc(event_logs::Column::Id)
            .all(&self.db)
            .await
    }
}
