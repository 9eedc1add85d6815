//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing an `AccountId` where a
//! `JournalEntryId` is expected. All ledger tables use `SERIAL` keys, so the
//! wrappers hold an `i32`.

use serde::{Deserialize, Serialize};

/// Error returned when a path or body value is not a valid id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a valid id")]
pub struct InvalidId(pub String);

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl $name {
            /// Wraps a raw database key.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Returns the raw database key.
            #[must_use]
            pub const fn into_inner(self) -> i32 {
                self.0
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<i32>()
                    .map(Self)
                    .map_err(|_| InvalidId(s.to_string()))
            }
        }
    };
}

typed_id!(UserId, "Unique identifier for a user.");
typed_id!(AccountId, "Unique identifier for a chart of accounts entry.");
typed_id!(CategoryId, "Unique identifier for an account category.");
typed_id!(SubcategoryId, "Unique identifier for an account subcategory.");
typed_id!(StatementId, "Unique identifier for a financial statement group.");
typed_id!(OrderId, "Unique identifier for a display-order slot.");
typed_id!(JournalEntryId, "Unique identifier for a journal entry.");
typed_id!(TransactionId, "Unique identifier for a ledger transaction.");
typed_id!(EventLogId, "Unique identifier for an audit event.");
typed_id!(NotificationId, "Unique identifier for a user notification.");

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
