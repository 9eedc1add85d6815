//! Error responses.
//!
//! Every failure leaves the API as
//! `{ "error": <CODE>, "message": <text>, "details": <object or null> }`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::{Value, json};
use tracing::error;

use tally_core::journal::JournalError;
use tally_core::policy::PolicyError;
use tally_core::reports::ReportError;
use tally_db::repositories::{
    AccountError, JournalEntryError, ReportRepoError, TransactionError,
};
use tally_shared::AppError;
use tally_shared::types::InvalidId;

/// An error ready to be rendered as an HTTP response.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status.
    pub status: StatusCode,
    /// Machine-readable code.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Structured extras, e.g. the totals of an unbalanced entry.
    pub details: Option<Value>,
}

impl ApiError {
    /// Builds an error from a numeric status.
    #[must_use]
    pub fn new(status: u16, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code,
            message: message.into(),
            details: None,
        }
    }

    /// 400 with the given code.
    #[must_use]
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(400, code, message)
    }

    /// 404 with the given code.
    #[must_use]
    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(404, code, message)
    }

    /// Attaches structured details.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = if self.status.is_server_error() {
            // Internal failures are logged, never echoed.
            error!(code = self.code, error = %self.message, "Request failed");
            "An internal error occurred".to_string()
        } else {
            self.message
        };

        (
            self.status,
            Json(json!({
                "error": self.code,
                "message": message,
                "details": self.details,
            })),
        )
            .into_response()
    }
}

fn journal_details(err: &JournalError) -> Option<Value> {
    match err {
        JournalError::Unbalanced {
            debit_total,
            credit_total,
        } => Some(json!({ "debitTotal": debit_total, "creditTotal": credit_total })),
        JournalError::InvalidAccounts(ids) => Some(json!({ "invalidAccountIds": ids })),
        JournalError::MissingFields(fields) => Some(json!({ "missingFields": fields })),
        _ => None,
    }
}

impl From<JournalError> for ApiError {
    fn from(err: JournalError) -> Self {
        let details = journal_details(&err);
        let mut api = Self::new(err.status_code(), err.error_code(), err.to_string());
        api.details = details;
        api
    }
}

impl From<JournalEntryError> for ApiError {
    fn from(err: JournalEntryError) -> Self {
        match err {
            JournalEntryError::Journal(inner) => inner.into(),
            other => Self::new(other.status_code(), other.error_code(), other.to_string()),
        }
    }
}

impl From<TransactionError> for ApiError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::Journal(inner) => inner.into(),
            other => Self::new(other.status_code(), other.error_code(), other.to_string()),
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        Self::new(err.status_code(), err.error_code(), err.to_string())
    }
}

impl From<ReportRepoError> for ApiError {
    fn from(err: ReportRepoError) -> Self {
        Self::new(err.status_code(), err.error_code(), err.to_string())
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        Self::new(err.status_code(), err.error_code(), err.to_string())
    }
}

impl From<PolicyError> for ApiError {
    fn from(err: PolicyError) -> Self {
        Self::new(err.status_code(), err.error_code(), err.to_string())
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::new(err.status_code(), err.error_code(), err.to_string())
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        AppError::Database(err.to_string()).into()
    }
}

impl From<InvalidId> for ApiError {
    fn from(err: InvalidId) -> Self {
        Self::bad_request("INVALID_ID", err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&err).ok();
        let mut api = Self::bad_request("VALIDATION_ERROR", err.to_string());
        api.details = details;
        api
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request("INVALID_JSON", rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request("INVALID_QUERY", rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request("INVALID_ID", rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use rust_decimal::Decimal;
    use tally_shared::types::AccountId;

    async fn body_json(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_unbalanced_carries_totals() {
        let err: ApiError = JournalError::Unbalanced {
            debit_total: Decimal::new(10000, 2),
            credit_total: Decimal::new(9000, 2),
        }
        .into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "UNBALANCED_ENTRY");
        assert_eq!(body["details"]["debitTotal"], "100.00");
        assert_eq!(body["details"]["creditTotal"], "90.00");
    }

    #[tokio::test]
    async fn test_invalid_accounts_listed() {
        let err: ApiError =
            JournalError::InvalidAccounts(vec![AccountId::new(4), AccountId::new(9)]).into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["invalidAccountIds"], json!([4, 9]));
    }

    #[tokio::test]
    async fn test_server_errors_hide_message() {
        let err: ApiError = DbErr::Custom("connection refused".into()).into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "DATABASE_ERROR");
        assert_eq!(body["message"], "An internal error occurred");
    }

    #[test]
    fn test_policy_statuses() {
        assert_eq!(
            ApiError::from(PolicyError::MissingActor).status,
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_transaction_journal_error_unwrapped() {
        let err: ApiError = TransactionError::Journal(JournalError::EmptyEdit).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "EMPTY_UPDATE");
    }
}
