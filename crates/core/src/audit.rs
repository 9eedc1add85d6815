//! Audit events.
//!
//! Every create or update of an account, journal entry or transaction is
//! recorded with full before/after snapshots of the row, not a diff.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tally_shared::types::UserId;

/// Kind of recorded change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventType {
    /// Row inserted.
    Create,
    /// Row changed.
    Update,
}

impl EventType {
    /// Returns the string representation of the event type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
        }
    }
}

/// Audited tables.
pub mod tables {
    /// Accounts.
    pub const ACCOUNTS: &str = "accounts";
    /// Journal entries.
    pub const JOURNAL_ENTRIES: &str = "journal_entries";
    /// Transactions.
    pub const TRANSACTIONS: &str = "transactions";
}

/// One audit record, ready to be appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    /// Create or update.
    pub event_type: EventType,
    /// Table of the changed row.
    pub table_name: &'static str,
    /// Primary key of the changed row.
    pub record_id: i32,
    /// Row before the change, absent on create.
    pub before: Option<Value>,
    /// Row after the change.
    pub after: Value,
    /// Acting user, if known.
    pub user_id: Option<UserId>,
}

impl AuditEvent {
    /// Records an insert.
    pub fn created<T: Serialize>(
        table_name: &'static str,
        record_id: i32,
        after: &T,
        user_id: Option<UserId>,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            event_type: EventType::Create,
            table_name,
            record_id,
            before: None,
            after: serde_json::to_value(after)?,
            user_id,
        })
    }

    /// Records an update.
    pub fn updated<T: Serialize>(
        table_name: &'static str,
        record_id: i32,
        before: &T,
        after: &T,
        user_id: Option<UserId>,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            event_type: EventType::Update,
            table_name,
            record_id,
            before: Some(serde_json::to_value(before)?),
            after: serde_json::to_value(after)?,
            user_id,
        })
    }
}
