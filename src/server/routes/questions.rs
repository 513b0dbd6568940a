use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use serde_json::Value;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_all_categories, questions},
        Question,
    },
    server::{
        app::AppState,
        error::ApiError,
        pagination::{Page, PageQuery},
    },
    telemetry::{QUESTIONS_CREATED, QUESTIONS_DELETED, SEARCHES},
};

use super::{ApiResponse, CategoryMap};

// category arrives as "1" from the frontend's select box
#[derive(Debug, Deserialize)]
struct NewQuestion {
    question: String,
    answer: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    category: i64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    difficulty: i64,
}

impl NewQuestion {
    fn validate(self) -> Result<Self, ApiError> {
        if self.question.trim().is_empty() || self.answer.trim().is_empty() {
            return Err(ApiError::Unprocessable);
        }
        Ok(self)
    }
}

#[derive(Serialize)]
struct QuestionsResponse {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    current_category: Option<String>,
    categories: CategoryMap,
}

#[derive(Serialize)]
struct SearchResponse {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    current_category: Option<String>,
}

#[derive(Serialize)]
struct CreatedResponse {
    success: bool,
    created: i64,
}

#[derive(Serialize)]
struct QuestionResponse {
    success: bool,
    question: Question,
}

#[derive(Serialize)]
struct DeletedResponse {
    success: bool,
    deleted: i64,
}

async fn get_questions(
    State(pool): State<SqlitePool>,
    Query(query): Query<PageQuery>,
) -> ApiResponse<Json<QuestionsResponse>> {
    let page = Page::try_from(query)?;
    let found = questions::list_questions(&pool, page.limit(), page.offset()).await?;
    page.ensure_in_range(found.questions.len())?;

    Ok(Json(QuestionsResponse {
        success: true,
        questions: found.questions,
        total_questions: found.total,
        current_category: None,
        categories: CategoryMap(get_all_categories(&pool).await?),
    }))
}

async fn create_or_search(
    State(pool): State<SqlitePool>,
    Query(query): Query<PageQuery>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResponse<Response> {
    // an absent or malformed body is an insert with no fields
    let body = match body {
        Ok(Json(body)) => body,
        Err(err) => {
            tracing::debug!(error = %err, "Unreadable question body");
            Value::Null
        }
    };

    let term = body
        .get("searchTerm")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(str::to_owned);
    match term {
        Some(term) => Ok(search(&pool, &term, query).await?.into_response()),
        None => Ok(create(&pool, body).await?.into_response()),
    }
}

async fn search(pool: &SqlitePool, term: &str, query: PageQuery) -> ApiResponse<Json<SearchResponse>> {
    let page = Page::try_from(query)?;
    let found = questions::search_questions(pool, term, page.limit(), page.offset()).await?;
    page.ensure_in_range(found.questions.len())?;
    SEARCHES.inc();
    tracing::debug!(term, page = page.number(), hits = found.total, "Searched questions");

    Ok(Json(SearchResponse {
        success: true,
        questions: found.questions,
        total_questions: found.total,
        current_category: None,
    }))
}

async fn create(pool: &SqlitePool, body: Value) -> ApiResponse<Json<CreatedResponse>> {
    let new_question = serde_json::from_value::<NewQuestion>(body)
        .map_err(|err| {
            tracing::debug!(error = %err, "Rejected question payload");
            ApiError::Unprocessable
        })?
        .validate()?;

    let id = questions::create_question(
        pool,
        &new_question.question,
        &new_question.answer,
        new_question.category,
        new_question.difficulty,
    )
    .await?;
    QUESTIONS_CREATED.inc();
    tracing::info!(id, category = new_question.category, "Created question");

    Ok(Json(CreatedResponse {
        success: true,
        created: id,
    }))
}

async fn get_question(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResponse<Json<QuestionResponse>> {
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;
    let question = questions::get_question_by_id(&pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(QuestionResponse {
        success: true,
        question,
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResponse<Json<DeletedResponse>> {
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;
    let deleted = questions::delete_question(&pool, id)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, id, "Failed to delete question");
            ApiError::Unprocessable
        })?;
    if !deleted {
        return Err(ApiError::Unprocessable);
    }
    QUESTIONS_DELETED.inc();
    tracing::info!(id, "Deleted question");

    Ok(Json(DeletedResponse {
        success: true,
        deleted: id,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(get_questions).post(create_or_search))
        .route("/questions/{id}", get(get_question).delete(delete_question))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_question_accepts_string_numbers() {
        let parsed: NewQuestion = serde_json::from_value(json!({
            "question": "Who is the founder of Microsoft",
            "answer": "Bill Gates",
            "category": "1",
            "difficulty": 3
        }))
        .unwrap();
        assert_eq!(parsed.category, 1);
        assert_eq!(parsed.difficulty, 3);
    }

    #[test]
    fn blank_text_is_unprocessable() {
        let parsed: NewQuestion = serde_json::from_value(json!({
            "question": "  ",
            "answer": "Bill Gates",
            "category": 1,
            "difficulty": 3
        }))
        .unwrap();
        assert!(matches!(parsed.validate(), Err(ApiError::Unprocessable)));
    }

    #[test]
    fn missing_fields_fail_to_parse() {
        assert!(serde_json::from_value::<NewQuestion>(json!({ "question": "Q" })).is_err());
        assert!(serde_json::from_value::<NewQuestion>(Value::Null).is_err());
    }
}
