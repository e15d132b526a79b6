use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use sqlx::SqlitePool;

// Liveness probe, no database access
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Readiness: both tables answer within 5 seconds and at least one category exists,
/// since questions cannot be added or browsed without one.
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    match tokio::time::timeout(std::time::Duration::from_secs(5), table_counts(&state.db)).await {
        Ok(Ok((0, _))) => (StatusCode::SERVICE_UNAVAILABLE, "not ready: no categories".to_string()).into_response(),
        Ok(Ok((categories, questions))) => {
            Json(json!({ "status": "ready", "categories": categories, "questions": questions })).into_response()
        }
        Ok(Err(e)) => (StatusCode::SERVICE_UNAVAILABLE, format!("not ready: {}", e)).into_response(),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "not ready: timeout".to_string()).into_response(),
    }
}

async fn table_counts(db: &SqlitePool) -> Result<(i64, i64), sqlx::Error> {
    let categories: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories").fetch_one(db).await?;
    let questions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions").fetch_one(db).await?;
    Ok((categories, questions))
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.get_snapshot())
}

pub async fn metrics_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    let body = state.metrics.get_snapshot().to_prometheus();
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}

pub async fn version(State(state): State<AppState>) -> impl IntoResponse {
    let body = json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "description": env!("CARGO_PKG_DESCRIPTION"),
        "questions_per_page": state.questions_per_page(),
        "build": {
            "profile": if cfg!(debug_assertions) { "debug" } else { "release" },
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
        }
    });
    (StatusCode::OK, Json(body))
}
