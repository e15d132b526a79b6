use std::{str::FromStr, time::Duration};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
    SqlitePool,
};

use crate::config::DatabaseConfig;

/// The category labels the trivia frontend ships icons for.
pub const DEFAULT_CATEGORIES: [&str; 6] = ["Science", "Art", "Geography", "History", "Entertainment", "Sports"];

pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&cfg.url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(10));

    let pool = SqlitePoolOptions::new()
        .max_connections(cfg.max_connections)
        .connect_with(options)
        .await?;
    Ok(pool)
}

pub async fn init_db(pool: &SqlitePool) -> anyhow::Result<()> {
    // Referential integrity between questions and categories depends on this.
    sqlx::query("PRAGMA foreign_keys=ON;").execute(pool).await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            type TEXT NOT NULL
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS questions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            question TEXT NOT NULL,
            answer TEXT NOT NULL,
            category INTEGER NOT NULL,
            difficulty INTEGER NOT NULL,
            question_folded TEXT NULL,
            FOREIGN KEY(category) REFERENCES categories(id)
        )"#,
    )
    .execute(pool)
    .await?;

    // Databases created before search folding existed lack the column.
    if let Err(e) = sqlx::query("ALTER TABLE questions ADD COLUMN question_folded TEXT NULL").execute(pool).await {
        match &e {
            sqlx::Error::Database(db_err) if db_err.message().to_lowercase().contains("duplicate") => {}
            _ => return Err(anyhow::anyhow!("Migration failed: {}", e)),
        }
    }
    backfill_folded_text(pool).await?;

    let indexes = [
        ("idx_questions_category", "CREATE INDEX IF NOT EXISTS idx_questions_category ON questions(category, id)"),
        (
            "uq_questions_question",
            "CREATE UNIQUE INDEX IF NOT EXISTS uq_questions_question ON questions(question)",
        ),
    ];
    for (name, query) in indexes {
        if let Err(e) = sqlx::query(query).execute(pool).await {
            // an older database may already hold duplicate texts; the handler-level check still applies
            tracing::warn!("Failed to create index {}: {}", name, e);
        }
    }

    Ok(())
}

/// Lowercased question text used for search. SQLite `LIKE` only folds ASCII,
/// so the folding happens here with full Unicode rules.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Fills `question_folded` for rows written without it. Returns the number of rows updated.
pub async fn backfill_folded_text(pool: &SqlitePool) -> anyhow::Result<usize> {
    let rows: Vec<(i64, String)> =
        sqlx::query_as("SELECT id, question FROM questions WHERE question_folded IS NULL").fetch_all(pool).await?;
    if rows.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    for (id, question) in &rows {
        sqlx::query("UPDATE questions SET question_folded = ?1 WHERE id = ?2")
            .bind(fold_case(question))
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    tracing::info!("Backfilled search text for {} questions", rows.len());
    Ok(rows.len())
}

/// Inserts [`DEFAULT_CATEGORIES`] if the table is empty. Returns the number of rows added.
pub async fn seed_categories(pool: &SqlitePool) -> anyhow::Result<usize> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories").fetch_one(pool).await?;
    if existing > 0 {
        tracing::debug!("categories already present ({}), skipping seed", existing);
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    for label in DEFAULT_CATEGORIES {
        sqlx::query("INSERT INTO categories (type) VALUES (?1)").bind(label).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    tracing::info!("Seeded {} default categories", DEFAULT_CATEGORIES.len());
    Ok(DEFAULT_CATEGORIES.len())
}
