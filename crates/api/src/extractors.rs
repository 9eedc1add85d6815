//! Request extractors whose rejections use the API error body.

use std::str::FromStr;

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;
use tally_shared::types::InvalidId;

/// JSON body extractor; malformed bodies become `INVALID_JSON` (400).
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor; malformed queries become `INVALID_QUERY` (400).
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Parses a path segment into a typed id.
///
/// # Errors
///
/// Returns `INVALID_ID` (400) when the segment is not an integer.
pub fn parse_id<T>(raw: &str) -> Result<T, ApiError>
where
    T: FromStr<Err = InvalidId>,
{
    Ok(raw.parse::<T>()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_shared::types::AccountId;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id::<AccountId>("12").unwrap(), AccountId::new(12));
        let err = parse_id::<AccountId>("twelve").unwrap_err();
        assert_eq!(err.code, "INVALID_ID");
    }
}
