use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use serde_json::Value;
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions::get_quiz_candidates, Question},
    server::{
        app::AppState,
        deserializers::{deserialize_present, LenientI64},
        error::ApiError,
    },
    telemetry::QUIZ_QUESTIONS_SERVED,
};

use super::ApiResponse;

/// Category id that stands for "every category".
const ALL_CATEGORIES: i64 = 0;

// fields stay raw so a missing field (400) can be told apart from a malformed one (422);
// an explicit null counts as present
#[derive(Deserialize)]
struct QuizRequest {
    #[serde(default, deserialize_with = "deserialize_present")]
    quiz_category: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_present")]
    previous_questions: Option<Value>,
}

#[derive(Deserialize)]
struct QuizCategory {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    id: i64,
}

#[derive(Serialize)]
struct QuizResponse {
    success: bool,
    question: Option<Question>,
}

async fn play_quiz(
    State(pool): State<SqlitePool>,
    body: Result<Json<QuizRequest>, JsonRejection>,
) -> ApiResponse<Json<QuizResponse>> {
    let Json(request) = body.map_err(|err| {
        tracing::debug!(error = %err, "Rejected quiz body");
        ApiError::BadRequest
    })?;
    let (Some(quiz_category), Some(previous_questions)) =
        (request.quiz_category, request.previous_questions)
    else {
        return Err(ApiError::BadRequest);
    };

    let category: QuizCategory =
        serde_json::from_value(quiz_category).map_err(|_| ApiError::Unprocessable)?;
    let previous: Vec<i64> = serde_json::from_value::<Vec<LenientI64>>(previous_questions)
        .map_err(|_| ApiError::Unprocessable)?
        .into_iter()
        .map(i64::from)
        .collect();

    let filter = (category.id != ALL_CATEGORIES).then_some(category.id);
    let candidates = get_quiz_candidates(&pool, filter, &previous)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "Failed to load quiz candidates");
            ApiError::Unprocessable
        })?;

    let question = pick_random(candidates);
    if question.is_some() {
        QUIZ_QUESTIONS_SERVED
            .with_label_values(&[category.id.to_string().as_str()])
            .inc();
    }

    Ok(Json(QuizResponse {
        success: true,
        question,
    }))
}

fn pick_random(mut candidates: Vec<Question>) -> Option<Question> {
    if candidates.is_empty() {
        return None;
    }
    let index = rand::thread_rng().gen_range(0..candidates.len());
    Some(candidates.swap_remove(index))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(play_quiz))
        .with_state(state)
}
