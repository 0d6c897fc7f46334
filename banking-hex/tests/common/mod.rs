//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use banking_hex::{AccountService, inbound::HttpServer};
use banking_repo::SqliteRepo;
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const ADMIN_KEY: &str = "admin-test-key";

/// Builds a router over a fresh in-memory SQLite database.
pub async fn test_app(requests_per_minute: u32) -> Router {
    let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();
    let service = AccountService::new(repo);
    HttpServer::with_rate_limit(service, ADMIN_KEY, requests_per_minute).router()
}

pub fn request(method: Method, uri: &str, key: Option<&str>, body: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(key) = key {
        builder = builder.header("Authorization", format!("Bearer {}", key));
    }
    match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Sends a request and returns the status with the JSON body (Null when empty).
pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Issues a customer API key through the admin endpoint.
pub async fn issue_key(app: &Router, customer_id: &str) -> String {
    let body = serde_json::json!({ "name": "test-key", "customer_id": customer_id }).to_string();
    let (status, json) = send(
        app,
        request(Method::POST, "/api/admin/keys", Some(ADMIN_KEY), Some(&body)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["api_key"].as_str().unwrap().to_string()
}

/// Opens an account and returns its id.
pub async fn open_account(app: &Router, key: &str, amount: i64) -> String {
    let body = serde_json::json!({ "account_type": "checking", "amount": amount }).to_string();
    let (status, json) = send(
        app,
        request(Method::POST, "/api/accounts", Some(key), Some(&body)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_str().unwrap().to_string()
}

pub fn amount_body(amount: i64) -> String {
    serde_json::json!({ "amount": amount }).to_string()
}
