//! Router-level and integration tests.
//!
//! - **api_tests**: categories, question listing, search, creation, deletion, health endpoints
//! - **quiz_tests**: quiz selection through the HTTP endpoint
//! - **db_tests**: schema creation and seeding
//! - **config_tests**: configuration loading and validation
//! - **error_tests**: error mapping and the JSON envelope
//!
//! Each test gets its own in-memory SQLite database.


use std::{str::FromStr, time::Duration};

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tower::ServiceExt;

use crate::{config::AppConfig, db, routes, state::AppState};

/// A single long-lived connection, so the in-memory database survives for the whole test.
pub(crate) async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap().foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect_with(options)
        .await
        .unwrap();
    db::init_db(&pool).await.unwrap();
    pool
}

pub(crate) async fn test_app(seed: bool) -> (Router, AppState) {
    let pool = test_pool().await;
    if seed {
        db::seed_categories(&pool).await.unwrap();
    }
    let state = AppState::new(pool, AppConfig::default());
    (routes::router(state.clone()), state)
}

pub(crate) async fn insert_question(pool: &SqlitePool, text: &str, category: i64, difficulty: i64) -> i64 {
    sqlx::query(
        "INSERT INTO questions (question, answer, category, difficulty, question_folded) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(text)
    .bind(format!("answer to {text}"))
    .bind(category)
    .bind(difficulty)
    .bind(db::fold_case(text))
    .execute(pool)
    .await
    .unwrap()
    .last_insert_rowid()
}

/// Sends one request and returns the status and the body parsed as JSON (`Value::Null` if not JSON).
pub(crate) async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub(crate) fn question_ids(body: &Value) -> Vec<i64> {
    body["questions"]
        .as_array()
        .map(|qs| qs.iter().filter_map(|q| q["id"].as_i64()).collect())
        .unwrap_or_default()
}
