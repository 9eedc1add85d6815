//! Report error types.

use chrono::NaiveDate;
use tally_shared::AppError;
use thiserror::Error;

use crate::reports::types::ReportKind;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// No approved activity in the range.
    #[error("No results found for {0} in the selected period")]
    NoDataFound(ReportKind),

    /// Path segment does not name a report.
    #[error("Unknown report type: {0}")]
    UnknownReportKind(String),
}

impl ReportError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidDateRange { .. } => 400,
            Self::NoDataFound(_) | Self::UnknownReportKind(_) => 404,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::NoDataFound(_) => "NO_RESULTS",
            Self::UnknownReportKind(_) => "UNKNOWN_REPORT",
        }
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::InvalidDateRange { .. } => Self::Validation(err.to_string()),
            ReportError::NoDataFound(_) | ReportError::UnknownReportKind(_) => {
                Self::NotFound(err.to_string())
            }
        }
    }
}
