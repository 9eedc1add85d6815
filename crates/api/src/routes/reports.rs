//! Financial report routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::{AppState, error::ApiError, extractors::ApiJson};
use tally_core::reports::{DateRange, FinancialReport, ReportKind};
use tally_db::repositories::ReportRepository;

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/trial-balance", post(trial_balance))
        .route("/income-statement", post(income_statement))
        .route("/balance-sheet", post(balance_sheet))
        .route("/retained-earnings", post(retained_earnings))
        .route("/reports/{kind}", post(any_report))
        .route("/ratios", get(ratios))
}

/// Request body for every report.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    /// First included date.
    pub start_date: Option<NaiveDate>,
    /// Last included date; open-ended when absent.
    pub end_date: Option<NaiveDate>,
}

impl ReportRequest {
    fn range(&self) -> Result<DateRange, ApiError> {
        Ok(DateRange::new(self.start_date, self.end_date)?)
    }
}

/// Renders a report without its kind tag.
fn untagged(report: FinancialReport) -> Response {
    match report {
        FinancialReport::TrialBalance(r) => Json(r).into_response(),
        FinancialReport::IncomeStatement(r) => Json(r).into_response(),
        FinancialReport::BalanceSheet(r) => Json(r).into_response(),
        FinancialReport::RetainedEarnings(r) => Json(r).into_response(),
    }
}

async fn generate(
    state: &AppState,
    kind: ReportKind,
    request: &ReportRequest,
) -> Result<FinancialReport, ApiError> {
    let range = request.range()?;
    let repo = ReportRepository::new((*state.db).clone());
    let report = repo.generate(kind, range).await?;
    info!(
        report = %kind,
        start_date = ?range.start_date,
        end_date = ?range.end_date,
        "Report generated"
    );
    Ok(report)
}

/// POST `/trial-balance`
async fn trial_balance(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ReportRequest>,
) -> Result<Response, ApiError> {
    Ok(untagged(generate(&state, ReportKind::TrialBalance, &request).await?))
}

/// POST `/income-statement`
async fn income_statement(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ReportRequest>,
) -> Result<Response, ApiError> {
    Ok(untagged(generate(&state, ReportKind::IncomeStatement, &request).await?))
}

/// POST `/balance-sheet`
async fn balance_sheet(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ReportRequest>,
) -> Result<Response, ApiError> {
    Ok(untagged(generate(&state, ReportKind::BalanceSheet, &request).await?))
}

/// POST `/retained-earnings`
async fn retained_earnings(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ReportRequest>,
) -> Result<Response, ApiError> {
    Ok(untagged(generate(&state, ReportKind::RetainedEarnings, &request).await?))
}

/// POST `/reports/{kind}` - Any report, tagged with its kind.
async fn any_report(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    ApiJson(request): ApiJson<ReportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let kind: ReportKind = kind.parse()?;
    Ok(Json(generate(&state, kind, &request).await?))
}

/// GET `/ratios` - Financial ratios from current balances.
async fn ratios(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let repo = ReportRepository::new((*state.db).clone());
    Ok(Json(repo.ratios().await?))
}
