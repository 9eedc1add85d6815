//! Journal entry state machine.

use chrono::{DateTime, Utc};
use tally_shared::types::UserId;

use crate::journal::error::JournalError;
use crate::journal::types::JournalEntryStatus;

/// A validated review decision with its audit data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewAction {
    /// Approve a pending entry; the caller posts its lines in the same unit of work.
    Approve {
        /// Status after the transition.
        new_status: JournalEntryStatus,
        /// Approver.
        reviewed_by: UserId,
        /// When the decision was taken.
        reviewed_at: DateTime<Utc>,
    },
    /// Reject a pending entry.
    Reject {
        /// Status after the transition.
        new_status: JournalEntryStatus,
        /// Rejecter.
        reviewed_by: UserId,
        /// When the decision was taken.
        reviewed_at: DateTime<Utc>,
        /// Trimmed rejection comment.
        comment: String,
    },
}

impl ReviewAction {
    /// Returns the status resulting from this action.
    #[must_use]
    pub fn new_status(&self) -> JournalEntryStatus {
        match self {
            Self::Approve { new_status, .. } | Self::Reject { new_status, .. } => *new_status,
        }
    }

    /// Returns the reviewing user.
    #[must_use]
    pub fn reviewed_by(&self) -> UserId {
        match self {
            Self::Approve { reviewed_by, .. } | Self::Reject { reviewed_by, .. } => *reviewed_by,
        }
    }
}

/// Stateless transition rules for journal entries.
pub struct JournalWorkflow;

impl JournalWorkflow {
    /// Approves a pending entry.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::InvalidTransition`] unless the entry is pending.
    pub fn approve(
        current: JournalEntryStatus,
        reviewed_by: UserId,
    ) -> Result<ReviewAction, JournalError> {
        match current {
            JournalEntryStatus::Pending => Ok(ReviewAction::Approve {
                new_status: JournalEntryStatus::Approved,
                reviewed_by,
                reviewed_at: Utc::now(),
            }),
            _ => Err(JournalError::InvalidTransition {
                from: current,
                to: JournalEntryStatus::Approved,
            }),
        }
    }

    /// Rejects a pending entry.
    ///
    /// The comment is checked before the state so an empty comment is always a
    /// validation error.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::CommentRequired`] for a blank comment and
    /// [`JournalError::InvalidTransition`] unless the entry is pending.
    pub fn reject(
        current: JournalEntryStatus,
        reviewed_by: UserId,
        comment: &str,
    ) -> Result<ReviewAction, JournalError> {
        let comment = Self::require_comment(comment)?;
        match current {
            JournalEntryStatus::Pending => Ok(ReviewAction::Reject {
                new_status: JournalEntryStatus::Rejected,
                reviewed_by,
                reviewed_at: Utc::now(),
                comment,
            }),
            _ => Err(JournalError::InvalidTransition {
                from: current,
                to: JournalEntryStatus::Rejected,
            }),
        }
    }

    /// Trims a rejection comment.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::CommentRequired`] if nothing is left.
    pub fn require_comment(comment: &str) -> Result<String, JournalError> {
        let trimmed = comment.trim();
        if trimmed.is_empty() {
            return Err(JournalError::CommentRequired);
        }
        Ok(trimmed.to_string())
    }
}
