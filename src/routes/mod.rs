//! HTTP route handlers for the trivia API.
//!
//! - `categories`: category lookup and per-category question listings
//! - `questions`: paginated listing, search, creation and deletion
//! - `quizzes`: random unseen question selection
//! - `health`: liveness, readiness, metrics and version endpoints

pub mod categories;
pub mod health;
pub mod questions;
pub mod quizzes;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::CorsConfig, error::AppError, middleware, state::AppState};

/// Builds the complete application: routes, fallbacks and middleware stack.
pub fn router(state: AppState) -> Router {
    let cfg = state.config.clone();

    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .route("/metrics", get(health::metrics))
        .route("/metrics/prometheus", get(health::metrics_prometheus))
        .route("/version", get(health::version))
        .route("/categories", get(categories::list_categories))
        .route("/categories/{id}/questions", get(categories::questions_by_category))
        .route("/questions", get(questions::list_questions).post(questions::search_questions))
        .route("/questions/add", post(questions::add_question))
        .route("/questions/{id}", delete(questions::delete_question))
        .route("/quizzes", post(quizzes::play_quiz))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
        .layer(DefaultBodyLimit::max(cfg.server.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&cfg.cors))
        .layer(from_fn_with_state(cfg, middleware::security_headers::security_headers_middleware))
}

async fn not_found() -> AppError {
    AppError::NotFound("no such route".into())
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

fn cors_layer(cfg: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    if cfg.allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = cfg
        .allowed_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}: {}", o, e);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
