use std::collections::BTreeMap;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::{category_map, get_all_categories},
            questions::{
                self, create_question, get_all_questions, search_questions,
            },
        },
        NewQuestion, Question,
    },
    server::{
        app::AppState,
        deserializers::{
            deserialize_lenient_page, deserialize_optional_id, deserialize_optional_text,
        },
        error::{ResultExt, TriviaError},
        pagination::paginate,
    },
    telemetry::{QUESTIONS_CREATED, QUESTIONS_DELETED},
};

use super::{success, ApiResponse, QuestionList, DEFAULT_CURRENT_CATEGORY};

#[derive(Deserialize)]
struct PageQuery {
    #[serde(default, deserialize_with = "deserialize_lenient_page")]
    page: Option<i64>,
}

#[derive(Deserialize)]
struct NewQuestionBody {
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    category: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    difficulty: Option<i64>,
}

impl From<NewQuestionBody> for NewQuestion {
    fn from(body: NewQuestionBody) -> Self {
        NewQuestion {
            question: body.question,
            answer: body.answer,
            category: body.category,
            difficulty: body.difficulty,
        }
    }
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(
        rename = "searchTerm",
        default,
        deserialize_with = "deserialize_optional_text"
    )]
    search_term: Option<String>,
}

#[derive(Serialize)]
struct QuestionsPage {
    questions: Vec<Question>,
    total_questions: usize,
    categories: BTreeMap<i64, String>,
    current_category: &'static str,
}

#[derive(Serialize)]
struct Created {
    created: i64,
}

#[derive(Serialize)]
struct Deleted {
    deleted: i64,
}

async fn questions_page(
    State(pool): State<SqlitePool>,
    Query(PageQuery { page }): Query<PageQuery>,
) -> ApiResponse<QuestionsPage> {
    let all = get_all_questions(&pool).await?;
    let total_questions = all.len();
    let categories = category_map(get_all_categories(&pool).await?);
    Ok(success(QuestionsPage {
        questions: paginate(all, page.unwrap_or(1)),
        total_questions,
        categories,
        current_category: DEFAULT_CURRENT_CATEGORY,
    }))
}

async fn insert_question(
    pool: &SqlitePool,
    body: Result<Json<NewQuestionBody>, JsonRejection>,
) -> Result<i64, TriviaError> {
    let Json(body) = body?;
    let id = create_question(pool, &body.into()).await?;
    QUESTIONS_CREATED.inc();
    tracing::info!("Created question {id}");
    Ok(id)
}

async fn post_question(
    State(pool): State<SqlitePool>,
    body: Result<Json<NewQuestionBody>, JsonRejection>,
) -> ApiResponse<Created> {
    let created = insert_question(&pool, body).await.or_unprocessable()?;
    Ok(success(Created { created }))
}

async fn remove_question(pool: &SqlitePool, id: i64) -> Result<i64, TriviaError> {
    if !questions::delete_question(pool, id).await? {
        return Err(TriviaError::NotFound {
            entity: "question",
            id,
        });
    }
    QUESTIONS_DELETED.inc();
    tracing::info!("Deleted question {id}");
    Ok(id)
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResponse<Deleted> {
    let Path(id) = path?;
    let deleted = remove_question(&pool, id).await.or_unprocessable()?;
    Ok(success(Deleted { deleted }))
}

async fn find_questions(
    pool: &SqlitePool,
    body: Result<Json<SearchBody>, JsonRejection>,
) -> Result<QuestionList, TriviaError> {
    let Json(body) = body?;
    let term = body
        .search_term
        .filter(|term| !term.is_empty())
        .ok_or(TriviaError::MissingField("searchTerm"))?;
    let questions = search_questions(pool, &term).await?;
    tracing::debug!("Search {term:?} matched {} questions", questions.len());
    Ok(QuestionList::new(questions, DEFAULT_CURRENT_CATEGORY))
}

async fn search(
    State(pool): State<SqlitePool>,
    body: Result<Json<SearchBody>, JsonRejection>,
) -> ApiResponse<QuestionList> {
    let list = find_questions(&pool, body).await.or_bad_request()?;
    Ok(success(list))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(questions_page).post(post_question))
        .route("/questions/{id}", delete(delete_question))
        .route("/questions/search", post(search))
        .with_state(state)
}
