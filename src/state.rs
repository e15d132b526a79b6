use std::sync::Arc;

use crate::config::AppConfig;
use crate::metrics::Metrics;

/// The shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Pool over the SQLite database holding `questions` and `categories`.
    pub db: sqlx::SqlitePool,
    pub config: Arc<AppConfig>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(db: sqlx::SqlitePool, config: AppConfig) -> Self {
        Self { db, config: Arc::new(config), metrics: Metrics::new() }
    }

    pub fn questions_per_page(&self) -> i64 {
        self.config.pagination.questions_per_page
    }
}
