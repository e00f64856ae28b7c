#![allow(clippy::unwrap_used)]

use super::*;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use chrono::Month;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

fn period() -> Period {
    Period::new(Month::June, 2025)
}

fn setup() -> (TempDir, AppState) {
    let dir = TempDir::new().unwrap();
    let tracker = Tracker::open(dir.path(), period()).unwrap();
    (dir, AppState::new(tracker, Some(period())))
}

async fn send(state: &AppState, method: Method, uri: &str) -> (StatusCode, Value) {
    let response = router(state.clone())
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

// ── GET ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_health() {
    let (_dir, state) = setup();
    let response = router(state)
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_get_root() {
    let (_dir, state) = setup();
    let (status, data) = send(&state, Method::GET, "/").await;

    assert_eq!(status, StatusCode::OK);
    for key in [
        "description",
        "version",
        "current_date",
        "current_budget",
        "current_expenditure",
        "current_remaining",
        "categories",
    ] {
        assert!(data.get(key).is_some(), "missing key {key}");
    }
    assert_eq!(data["month"], "June");
    assert_eq!(data["year"], 2025);
    assert_eq!(data["current_budget"], 0);
    assert_eq!(data["categories"], serde_json::json!([]));
}

#[tokio::test]
async fn test_get_categories() {
    let (_dir, state) = setup();
    send(&state, Method::PUT, "/budget?new_budget=500").await;
    send(&state, Method::POST, "/categories?new_category=Rent&budget=300").await;

    let (status, data) = send(&state, Method::GET, "/categories").await;
    assert_eq!(status, StatusCode::OK);
    assert!(data.get("description").is_some());
    assert!(data.get("version").is_some());
    assert!(data.get("current_date").is_some());
    assert_eq!(data["categories"], serde_json::json!(["rent"]));
    assert_eq!(data["breakdown"]["rent"]["budget"], 300);
    assert_eq!(data["breakdown"]["rent"]["expenditure"], 0);
    assert_eq!(data["breakdown"]["rent"]["remaining"], 300);
}

// ── PUT /budget ───────────────────────────────────────────────

#[tokio::test]
async fn test_put_budget_is_less_than_zero() {
    let (_dir, state) = setup();
    send(&state, Method::PUT, "/budget?new_budget=250").await;

    let (status, data) = send(&state, Method::PUT, "/budget?new_budget=-42").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["message"], "Monthly budget cannot be less than zero.");

    let (_, root) = send(&state, Method::GET, "/").await;
    assert_eq!(root["current_budget"], 250);
}

#[tokio::test]
async fn test_put_budget_is_zero_or_greater() {
    let (_dir, state) = setup();
    for budget in [0, 1, 9_999_999] {
        let (status, data) =
            send(&state, Method::PUT, &format!("/budget?new_budget={budget}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(data["current_budget"], budget);
        assert!(data.get("warning").is_none());
    }
}

#[tokio::test]
async fn test_put_budget_below_allocation_warns() {
    let (_dir, state) = setup();
    send(&state, Method::PUT, "/budget?new_budget=500").await;
    send(&state, Method::POST, "/categories?new_category=rent&budget=400").await;

    let (_, data) = send(&state, Method::PUT, "/budget?new_budget=300").await;
    assert_eq!(data["current_budget"], 300);
    assert_eq!(data["allocated_budget"], 400);
    assert!(data["warning"].as_str().unwrap().contains("100"));
}

#[tokio::test]
async fn test_put_budget_requires_integer() {
    let (_dir, state) = setup();
    let (status, _) = send(&state, Method::PUT, "/budget?new_budget=lots").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&state, Method::PUT, "/budget").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── POST /categories ──────────────────────────────────────────

#[tokio::test]
async fn test_add_category() {
    let (_dir, state) = setup();
    send(&state, Method::PUT, "/budget?new_budget=500").await;

    let (status, data) = send(
        &state,
        Method::POST,
        "/categories?new_category=Groceries&budget=200",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["message"], "Category groceries added successfully.");
    assert_eq!(data["category"]["name"], "groceries");
    assert_eq!(data["category"]["month"], "June");
    assert_eq!(data["category"]["year"], 2025);
    assert_eq!(data["category"]["budget"], 200);
    assert_eq!(data["category"]["expenditure"], 0);
    assert_eq!(data["category"]["remaining"], 200);
    assert!(data["category"]["created_at"].is_string());
    assert_eq!(data["current_budget"], 500);
}

#[tokio::test]
async fn test_add_category_when_exists() {
    let (_dir, state) = setup();
    let uri = "/categories?new_category=test_category&budget=0";
    send(&state, Method::POST, uri).await;

    let (status, data) = send(&state, Method::POST, uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["message"], "Category already exists.");
}

#[tokio::test]
async fn test_add_category_over_allocated() {
    let (_dir, state) = setup();
    send(&state, Method::PUT, "/budget?new_budget=500").await;
    send(&state, Method::POST, "/categories?new_category=groceries&budget=200").await;

    let (status, data) = send(&state, Method::POST, "/categories?new_category=rent&budget=350").await;
    assert_eq!(status, StatusCode::OK);
    assert!(data["message"]
        .as_str()
        .unwrap()
        .contains("greater than the unallocated budget of 300"));
    assert!(data.get("category").is_none());

    let (_, listing) = send(&state, Method::GET, "/categories").await;
    assert_eq!(listing["categories"], serde_json::json!(["groceries"]));
}

#[tokio::test]
async fn test_add_category_requires_params() {
    let (_dir, state) = setup();
    let (status, _) = send(&state, Method::POST, "/categories?new_category=rent").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── DELETE /categories ────────────────────────────────────────

#[tokio::test]
async fn test_remove_category() {
    let (_dir, state) = setup();
    send(&state, Method::PUT, "/budget?new_budget=500").await;
    send(&state, Method::POST, "/categories?new_category=groceries&budget=200").await;

    let (status, data) = send(&state, Method::DELETE, "/categories?category=Groceries").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["message"], "Category groceries removed successfully.");

    let (_, root) = send(&state, Method::GET, "/").await;
    assert_eq!(root["categories"], serde_json::json!([]));

    let (_, data) = send(&state, Method::POST, "/categories?new_category=groceries&budget=200").await;
    assert_eq!(data["message"], "Category groceries added successfully.");
}

#[tokio::test]
async fn test_remove_missing_category() {
    let (_dir, state) = setup();
    let (status, data) = send(&state, Method::DELETE, "/categories?category=nothing").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["message"], "Category does not exist.");
}

// ── Storage failures ──────────────────────────────────────────

#[tokio::test]
async fn test_storage_failure_is_internal_error() {
    let (dir, state) = setup();
    // Replace the categories file with a directory so opening it fails
    let path = dir.path().join(crate::db::CATEGORIES_DB_FILE);
    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir(&path).unwrap();

    let (status, data) = send(&state, Method::GET, "/categories").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(data["message"].as_str().unwrap().starts_with("Internal error"));
}
