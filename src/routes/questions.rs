use axum::{extract::State, Json};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::{
    db,
    error::{
        validation::{validate_difficulty, validate_not_blank},
        AppError, AppResult, OptionExt,
    },
    extract::{ApiJson, ApiPath, ApiQuery},
    pagination::{Page, PageQuery},
    routes::categories::all_categories,
    state::AppState,
    types::{CreatedResponse, DeletedResponse, NewQuestion, Question, QuestionPage, SearchRequest},
};

const LIKE_ESCAPE: char = '!';

/// Which rows a paginated listing draws from.
#[derive(Debug, Clone)]
pub(crate) enum QuestionFilter {
    All,
    Category(i64),
    /// A LIKE pattern over the case-folded question text, already escaped and wrapped in `%`.
    TextContains(String),
}

impl QuestionFilter {
    fn push_where(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            QuestionFilter::All => {}
            QuestionFilter::Category(id) => {
                qb.push(" WHERE category = ").push_bind(*id);
            }
            QuestionFilter::TextContains(pattern) => {
                qb.push(" WHERE question_folded LIKE ").push_bind(pattern.clone()).push(" ESCAPE '!'");
            }
        }
    }
}

pub(crate) fn escape_like_pattern(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            out.push(LIKE_ESCAPE);
        }
        out.push(ch);
    }
    out
}

/// Returns the requested page of matching questions (ordered by id) and the total match count.
pub(crate) async fn load_page(
    db: &SqlitePool,
    filter: &QuestionFilter,
    page: Page,
) -> AppResult<(Vec<Question>, i64)> {
    let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) AS cnt FROM questions");
    filter.push_where(&mut count);
    let total: i64 = count.build().fetch_one(db).await?.try_get("cnt")?;

    let Some((limit, offset)) = page.window() else {
        return Ok((Vec::new(), total));
    };

    let mut qb =
        QueryBuilder::<Sqlite>::new("SELECT id, question, answer, category, difficulty FROM questions");
    filter.push_where(&mut qb);
    qb.push(" ORDER BY id LIMIT ").push_bind(limit).push(" OFFSET ").push_bind(offset);
    let questions = qb.build_query_as::<Question>().fetch_all(db).await?;

    Ok((questions, total))
}

/// Builds the listing body shared by the list, search and per-category endpoints.
/// An empty page is a 404.
pub(crate) async fn question_page(
    state: &AppState,
    filter: QuestionFilter,
    page_number: i64,
    current_category: Option<i64>,
) -> AppResult<QuestionPage> {
    let page = Page::new(page_number, state.questions_per_page());
    let (questions, total_questions) = load_page(&state.db, &filter, page).await?;
    if questions.is_empty() {
        return Err(AppError::NotFound(format!("no questions on page {}", page_number)));
    }
    let categories = all_categories(&state.db).await?;

    Ok(QuestionPage {
        success: true,
        questions,
        total_questions,
        categories,
        current_category,
        page: page_number,
    })
}

pub async fn list_questions(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> AppResult<Json<QuestionPage>> {
    let page = question_page(&state, QuestionFilter::All, query.number(), None).await?;
    Ok(Json(page))
}

pub async fn search_questions(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
    ApiJson(req): ApiJson<SearchRequest>,
) -> AppResult<Json<QuestionPage>> {
    state.metrics.inc_searches();
    tracing::debug!(term = %req.search_term, page = query.number(), "searching questions");

    let pattern = format!("%{}%", escape_like_pattern(&db::fold_case(&req.search_term)));
    let page = question_page(&state, QuestionFilter::TextContains(pattern), query.number(), None).await?;
    Ok(Json(page))
}

pub async fn add_question(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewQuestion>,
) -> AppResult<Json<CreatedResponse>> {
    let category: i64 = req.category.into();
    let difficulty: i64 = req.difficulty.into();
    validate_not_blank(&req.question, "question")?;
    validate_not_blank(&req.answer, "answer")?;
    validate_difficulty(difficulty)?;

    let category_exists: Option<i64> = sqlx::query_scalar("SELECT id FROM categories WHERE id = ?1")
        .bind(category)
        .fetch_optional(&state.db)
        .await?;
    if category_exists.is_none() {
        return Err(AppError::Unprocessable(format!("category {} does not exist", category)));
    }

    let duplicate: Option<i64> = sqlx::query_scalar("SELECT id FROM questions WHERE question = ?1 LIMIT 1")
        .bind(&req.question)
        .fetch_optional(&state.db)
        .await?;
    if let Some(existing) = duplicate {
        return Err(reject_duplicate(&state, format!("question already exists with id {}", existing)));
    }

    // A single autocommit INSERT takes the write lock up front; the unique index on
    // `question` settles races the lookup above cannot see.
    let inserted = sqlx::query(
        r#"INSERT INTO questions (question, answer, category, difficulty, question_folded)
           VALUES (?1, ?2, ?3, ?4, ?5)"#,
    )
    .bind(&req.question)
    .bind(&req.answer)
    .bind(category)
    .bind(difficulty)
    .bind(db::fold_case(&req.question))
    .execute(&state.db)
    .await;

    let id = match inserted {
        Ok(result) => result.last_insert_rowid(),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            return Err(reject_duplicate(&state, "question already exists".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    state.metrics.inc_questions_created();
    tracing::info!(question_id = id, category, "question created");
    Ok(Json(CreatedResponse { success: true, created: id }))
}

fn reject_duplicate(state: &AppState, detail: String) -> AppError {
    state.metrics.inc_duplicates_rejected();
    tracing::info!("rejected duplicate question: {}", detail);
    AppError::Unprocessable(detail)
}

pub async fn delete_question(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<DeletedResponse>> {
    let result = sqlx::query("DELETE FROM questions WHERE id = ?1").bind(id).execute(&state.db).await?;
    (result.rows_affected() > 0).then_some(()).ok_or_not_found(&format!("Question ID {}", id))?;

    state.metrics.inc_questions_deleted();
    tracing::info!(question_id = id, "question deleted");
    Ok(Json(DeletedResponse {
        success: true,
        deleted: id,
        message: format!("Question ID {} has been deleted", id),
    }))
}
