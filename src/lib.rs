//! # Trivia API
//!
//! Backend for a trivia game: a catalogue of questions grouped into
//! categories, paginated listings, text search, and a quiz endpoint that
//! serves a random question the player has not seen yet.
//!
//! ## Architecture
//!
//! - **Axum** for routing and extraction
//! - **SQLx** over SQLite for the `questions` and `categories` tables
//! - **Tokio** runtime, **Serde** for the JSON API
//!
//! ## Modules
//!
//! - [`config`]: layered configuration (embedded defaults, files, environment)
//! - [`db`]: connection setup, schema and category seeding
//! - [`error`]: [`error::AppError`] and its JSON error envelope
//! - [`extract`]: extractors that report rejections through `AppError`
//! - [`pagination`]: page-window arithmetic
//! - [`routes`]: HTTP handlers and the application router
//! - [`state`]: shared application state

pub mod config;
pub mod db;
pub mod deserializers;
pub mod error;
pub mod extract;
pub mod metrics;
pub mod middleware;
pub mod pagination;
pub mod routes;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
