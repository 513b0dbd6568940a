use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_all_categories, questions::list_questions_for_category},
        Question,
    },
    server::{
        app::AppState,
        error::ApiError,
        pagination::{Page, PageQuery},
    },
};

use super::{ApiResponse, CategoryMap};

#[derive(Serialize)]
struct CategoriesResponse {
    success: bool,
    categories: CategoryMap,
}

#[derive(Serialize)]
struct CategoryQuestionsResponse {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    current_category: Option<String>,
    categories: CategoryMap,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<Json<CategoriesResponse>> {
    let categories = get_all_categories(&pool).await?;
    Ok(Json(CategoriesResponse {
        success: true,
        categories: CategoryMap(categories),
    }))
}

async fn questions_for_category(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
    Query(query): Query<PageQuery>,
) -> ApiResponse<Json<CategoryQuestionsResponse>> {
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;
    let page = Page::try_from(query)?;

    let found = list_questions_for_category(&pool, id, page.limit(), page.offset()).await?;
    if found.questions.is_empty() {
        return Err(ApiError::NotFound);
    }

    let categories = CategoryMap(get_all_categories(&pool).await?);
    Ok(Json(CategoryQuestionsResponse {
        success: true,
        questions: found.questions,
        total_questions: found.total,
        current_category: categories.label(id).map(str::to_owned),
        categories,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(questions_for_category))
        .with_state(state)
}
