//! Authorization policy for review actions.
//!
//! The fronting auth layer establishes who the caller is; this module only
//! decides whether that role may perform a given action.

use serde::{Deserialize, Serialize};
use std::fmt;
use tally_shared::AppError;
use tally_shared::types::UserId;
use thiserror::Error;

/// User role as stored by the auth layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Full access.
    Administrator,
    /// Reviews journal entries.
    Manager,
    /// Creates accounts and journal entries.
    Accountant,
}

impl Role {
    /// Parses a role, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "ADMINISTRATOR" | "ADMIN" => Some(Self::Administrator),
            "MANAGER" => Some(Self::Manager),
            "ACCOUNTANT" => Some(Self::Accountant),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Administrator => "ADMINISTRATOR",
            Self::Manager => "MANAGER",
            Self::Accountant => "ACCOUNTANT",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Actions gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Approve a pending journal entry.
    ApproveEntries,
    /// Reject a pending journal entry.
    RejectEntries,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ApproveEntries => "approve journal entries",
            Self::RejectEntries => "reject journal entries",
        })
    }
}

/// The authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// Caller's user id.
    pub user_id: UserId,
    /// Caller's role.
    pub role: Role,
}

/// Authorization failures.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// No caller identity was supplied.
    #[error("Caller identity is required")]
    MissingActor,

    /// Role lacks the capability.
    #[error("Role {role} may not {capability}")]
    Forbidden {
        /// Caller's role.
        role: Role,
        /// Requested capability.
        capability: Capability,
    },
}

impl PolicyError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingActor => 401,
            Self::Forbidden { .. } => 403,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingActor => "UNAUTHORIZED",
            Self::Forbidden { .. } => "FORBIDDEN",
        }
    }
}

impl From<PolicyError> for AppError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::MissingActor => Self::Unauthorized(err.to_string()),
            PolicyError::Forbidden { .. } => Self::Forbidden(err.to_string()),
        }
    }
}

/// True if `role` holds `capability`.
#[must_use]
pub const fn allows(role: Role, capability: Capability) -> bool {
    match capability {
        Capability::ApproveEntries | Capability::RejectEntries => {
            matches!(role, Role::Administrator | Role::Manager)
        }
    }
}

/// Checks that the caller holds `capability`.
///
/// # Errors
///
/// Returns [`PolicyError::Forbidden`] otherwise.
pub fn authorize(actor: &Actor, capability: Capability) -> Result<(), PolicyError> {
    if allows(actor.role, capability) {
        Ok(())
    } else {
        Err(PolicyError::Forbidden {
            role: actor.role,
            capability,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Role::Administrator, true)]
    #[case(Role::Manager, true)]
    #[case(Role::Accountant, false)]
    fn test_review_capabilities(#[case] role: Role, #[case] allowed: bool) {
        let actor = Actor {
            user_id: UserId::new(1),
            role,
        };
        assert_eq!(authorize(&actor, Capability::ApproveEntries).is_ok(), allowed);
        assert_eq!(authorize(&actor, Capability::RejectEntries).is_ok(), allowed);
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("manager"), Some(Role::Manager));
        assert_eq!(Role::parse(" Admin "), Some(Role::Administrator));
        assert_eq!(Role::parse("guest"), None);
    }

    #[test]
    fn test_forbidden_maps_to_403() {
        let err = PolicyError::Forbidden {
            role: Role::Accountant,
            capability: Capability::ApproveEntries,
        };
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.to_string(), "Role ACCOUNTANT may not approve journal entries");
        assert!(matches!(AppError::from(err), AppError::Forbidden(_)));
        assert_eq!(PolicyError::MissingActor.status_code(), 401);
    }
}
