use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    config::QuizOrder,
    db::{queries::questions::next_quiz_question, Question},
    server::{
        app::AppState,
        deserializers::deserialize_id,
        error::{ResultExt, TriviaError},
    },
    telemetry::QUIZ_QUESTIONS_SERVED,
};

use super::{success, ApiResponse};

/// Selecting this category id means "any category".
const ALL_CATEGORIES: i64 = 0;

#[derive(Deserialize)]
struct QuizBody {
    #[serde(default)]
    previous_questions: Option<Vec<i64>>,
    #[serde(default)]
    quiz_category: Option<QuizCategory>,
}

// The frontend also sends the category's `type`, which is ignored.
#[derive(Deserialize)]
struct QuizCategory {
    #[serde(deserialize_with = "deserialize_id")]
    id: i64,
}

#[derive(Serialize)]
struct NextQuestion {
    question: Option<Question>,
}

async fn pick_question(
    pool: &SqlitePool,
    order: QuizOrder,
    body: Result<Json<QuizBody>, JsonRejection>,
) -> Result<Option<Question>, TriviaError> {
    let Json(body) = body?;
    let previous = body
        .previous_questions
        .ok_or(TriviaError::MissingField("previous_questions"))?;
    let category = body
        .quiz_category
        .ok_or(TriviaError::MissingField("quiz_category"))?;
    let category = (category.id != ALL_CATEGORIES).then_some(category.id);

    let question = next_quiz_question(pool, category, &previous, order).await?;
    if question.is_some() {
        let label = category.map_or_else(|| "all".to_owned(), |id| id.to_string());
        QUIZ_QUESTIONS_SERVED.with_label_values(&[label.as_str()]).inc();
    }
    Ok(question)
}

async fn quiz_question(
    State(pool): State<SqlitePool>,
    State(order): State<QuizOrder>,
    body: Result<Json<QuizBody>, JsonRejection>,
) -> ApiResponse<NextQuestion> {
    let question = pick_question(&pool, order, body).await.or_unprocessable()?;
    Ok(success(NextQuestion { question }))
}

pub fn quiz_router(state: AppState) -> Router {
    Router::new()
        .route("/question/quiz", post(quiz_question))
        .with_state(state)
}
