//! Router tests for requests that fail before reaching the database.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use http_body_util::BodyExt;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::middleware::{USER_ID_HEADER, USER_ROLE_HEADER};
use crate::{AppState, create_router};

fn app() -> Router {
    create_router(AppState::new(DatabaseConnection::default()))
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn with_actor(mut request: Request<Body>, role: &'static str) -> Request<Body> {
    let headers = request.headers_mut();
    headers.insert(USER_ID_HEADER, "3".parse().unwrap());
    headers.insert(USER_ROLE_HEADER, role.parse().unwrap());
    request
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_unbalanced_entry_rejected_with_totals() {
    let (status, body) = send(json_request(
        "POST",
        "/journal-entries/new",
        &json!({
            "description": "Cash sale",
            "date": "2026-03-01",
            "userId": 1,
            "transactions": [
                { "accountId": 1, "type": "DEBIT", "amount": 100 },
                { "accountId": 2, "type": "CREDIT", "amount": 90 }
            ]
        }),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "UNBALANCED_ENTRY");
    assert_eq!(body["details"]["debitTotal"], "100");
    assert_eq!(body["details"]["creditTotal"], "90");
}

#[tokio::test]
async fn test_missing_entry_fields_listed() {
    let (status, body) = send(json_request(
        "POST",
        "/journal-entries/new",
        &json!({ "description": "No lines" }),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "MISSING_FIELDS");
    assert_eq!(body["details"]["missingFields"], json!(["date", "userId", "transactions"]));
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/journal-entries/new")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_JSON");
}

#[tokio::test]
async fn test_approve_requires_actor() {
    let request = Request::builder()
        .method("PATCH")
        .uri("/journal-entries/5/approve")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_accountant_cannot_approve() {
    let request = Request::builder()
        .method("PATCH")
        .uri("/journal-entries/5/approve")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(with_actor(request, "ACCOUNTANT")).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");
}

#[tokio::test]
async fn test_approve_bad_id() {
    let request = Request::builder()
        .method("PATCH")
        .uri("/journal-entries/abc/approve")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(with_actor(request, "MANAGER")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_ID");
}

#[tokio::test]
async fn test_bad_id_checked_before_actor() {
    let approve = Request::builder()
        .method("PATCH")
        .uri("/journal-entries/abc/approve")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(approve).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_ID");

    let reject = json_request(
        "PATCH",
        "/journal-entries/1.5/reject",
        &json!({ "comment": "Wrong account" }),
    );
    let (status, body) = send(reject).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_ID");
}

#[tokio::test]
async fn test_reject_requires_comment() {
    let request = json_request(
        "PATCH",
        "/journal-entries/5/reject",
        &json!({ "comment": "   " }),
    );
    let (status, body) = send(with_actor(request, "MANAGER")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "COMMENT_REQUIRED");
}

#[tokio::test]
async fn test_report_rejects_reversed_range() {
    let (status, body) = send(json_request(
        "POST",
        "/trial-balance",
        &json!({ "startDate": "2026-05-01", "endDate": "2026-04-01" }),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_DATE_RANGE");
}

#[tokio::test]
async fn test_unknown_report_kind() {
    let (status, body) = send(json_request("POST", "/reports/cash-flow", &json!({}))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "UNKNOWN_REPORT");
}

#[tokio::test]
async fn test_empty_transaction_edit() {
    let (status, body) = send(json_request("PATCH", "/transactions/9", &json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "EMPTY_UPDATE");
}

#[tokio::test]
async fn test_transaction_edit_rejects_fractional_cents() {
    let (status, body) = send(json_request(
        "PATCH",
        "/transactions/9",
        &json!({ "amount": "10.005" }),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_AMOUNT");
}

#[tokio::test]
async fn test_account_name_required() {
    let (status, body) = send(json_request(
        "POST",
        "/accounts/new",
        &json!({
            "name": "",
            "normalSide": "Debit",
            "categoryId": 1,
            "orderId": 1,
            "statementId": 1
        }),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_health_reports_database_down() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["database"], "down");
}
