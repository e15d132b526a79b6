use axum::{extract::State, Json};
use sqlx::SqlitePool;

use crate::{
    error::{AppError, AppResult},
    extract::{ApiPath, ApiQuery},
    pagination::PageQuery,
    routes::questions::{question_page, QuestionFilter},
    state::AppState,
    types::{CategoriesResponse, Category, CategoryMap, QuestionPage},
};

/// Every category as an id -> label map.
pub async fn all_categories(db: &SqlitePool) -> AppResult<CategoryMap> {
    let rows = sqlx::query_as::<_, Category>("SELECT id, type FROM categories ORDER BY id")
        .fetch_all(db)
        .await?;
    Ok(rows.into_iter().map(|c| (c.id, c.kind)).collect())
}

pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<CategoriesResponse>> {
    let categories = all_categories(&state.db).await?;
    if categories.is_empty() {
        return Err(AppError::NotFound("no categories".into()));
    }
    Ok(Json(CategoriesResponse { success: true, categories }))
}

pub async fn questions_by_category(
    State(state): State<AppState>,
    ApiPath(category_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> AppResult<Json<QuestionPage>> {
    let page =
        question_page(&state, QuestionFilter::Category(category_id), query.number(), Some(category_id)).await?;
    Ok(Json(page))
}
