use std::collections::BTreeMap;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::queries::{
        categories::{category_map, get_all_categories, get_category},
        questions::get_questions_for_category,
    },
    server::{
        app::AppState,
        error::{ResultExt, TriviaError},
    },
};

use super::{success, ApiResponse, QuestionList};

#[derive(Serialize)]
struct CategoriesBody {
    categories: BTreeMap<i64, String>,
    total_categories: usize,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<CategoriesBody> {
    let categories = category_map(get_all_categories(&pool).await?);
    Ok(success(CategoriesBody {
        total_categories: categories.len(),
        categories,
    }))
}

async fn questions_in_category(pool: &SqlitePool, id: i64) -> Result<QuestionList, TriviaError> {
    let category = get_category(pool, id)
        .await?
        .ok_or(TriviaError::NotFound {
            entity: "category",
            id,
        })?;
    let questions = get_questions_for_category(pool, category.id).await?;
    Ok(QuestionList::new(questions, category.kind))
}

async fn category_questions(
    State(pool): State<SqlitePool>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResponse<QuestionList> {
    let Path(id) = path?;
    let list = questions_in_category(&pool, id).await.or_unprocessable()?;
    Ok(success(list))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(category_questions))
        .with_state(state)
}
