//! Journal entry lifecycle.
//!
//! This module provides:
//! - Input validation for new entries (required fields, account ids, amounts,
//!   exact debit/credit balance, account availability)
//! - The review state machine (PENDING → APPROVED | REJECTED)
//! - Rules for editing individual transaction lines

pub mod edit;
pub mod error;
pub mod types;
pub mod validation;
pub mod workflow;

#[cfg(test)]
mod validation_props;

pub use edit::{EditPlan, EditTarget, TransactionEdit, plan_edit};
pub use error::JournalError;
pub use types::{
    AccountAvailability, DraftLine, JournalEntryDraft, JournalEntryStatus, ValidatedEntry,
    ValidatedLine, approval_request_message, format_pr,
};
pub use validation::{
    AMOUNT_SCALE, coerce_account_id, ensure_accounts_postable, ensure_balanced,
    ensure_valid_amount, validate_draft,
};
pub use workflow::{JournalWorkflow, ReviewAction};
