//! Caller identity taken from headers set by the fronting auth layer.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};

use crate::error::ApiError;
use tally_core::policy::{Actor, PolicyError, Role};
use tally_shared::types::UserId;

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the caller's role.
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Reads the caller from the identity headers.
///
/// # Errors
///
/// Returns [`PolicyError::MissingActor`] if either header is absent or
/// unreadable.
pub fn actor_from_headers(headers: &HeaderMap) -> Result<Actor, PolicyError> {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    let user_id = header(USER_ID_HEADER)
        .and_then(|v| v.parse::<UserId>().ok())
        .ok_or(PolicyError::MissingActor)?;
    let role = header(USER_ROLE_HEADER)
        .and_then(Role::parse)
        .ok_or(PolicyError::MissingActor)?;

    Ok(Actor { user_id, role })
}

/// Extractor for the calling user.
///
/// ```ignore
/// async fn handler(CurrentActor(actor): CurrentActor) -> impl IntoResponse {
///     authorize(&actor, Capability::ApproveEntries)?;
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CurrentActor(pub Actor);

impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(actor_from_headers(&parts.headers)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(id: Option<&'static str>, role: Option<&'static str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(id) = id {
            map.insert(USER_ID_HEADER, HeaderValue::from_static(id));
        }
        if let Some(role) = role {
            map.insert(USER_ROLE_HEADER, HeaderValue::from_static(role));
        }
        map
    }

    #[test]
    fn test_actor_read_from_headers() {
        let actor = actor_from_headers(&headers(Some("7"), Some("manager"))).unwrap();
        assert_eq!(actor.user_id, UserId::new(7));
        assert_eq!(actor.role, Role::Manager);
    }

    #[test]
    fn test_missing_or_bad_headers_rejected() {
        assert!(actor_from_headers(&headers(None, Some("MANAGER"))).is_err());
        assert!(actor_from_headers(&headers(Some("7"), None)).is_err());
        assert!(actor_from_headers(&headers(Some("abc"), Some("MANAGER"))).is_err());
        assert!(actor_from_headers(&headers(Some("7"), Some("CEO"))).is_err());
    }
}
