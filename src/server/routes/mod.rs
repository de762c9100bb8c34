mod categories;
mod questions;
mod quiz;

pub use categories::category_router;
pub use questions::questions_router;
pub use quiz::quiz_router;

use axum::Json;
use serde::Serialize;

use crate::db::Question;

use super::error::ApiError;

/// Shown as the current category wherever the listing is not scoped to one.
pub const DEFAULT_CURRENT_CATEGORY: &str = "Science";

/// A successful body: the payload's fields next to `"success": true`.
#[derive(Debug, Serialize)]
pub struct Success<T> {
    success: bool,
    #[serde(flatten)]
    body: T,
}

pub type ApiResponse<T> = Result<Json<Success<T>>, ApiError>;

pub fn success<T: Serialize>(body: T) -> Json<Success<T>> {
    Json(Success {
        success: true,
        body,
    })
}

#[derive(Debug, Serialize)]
pub struct QuestionList {
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub current_category: String,
}

impl QuestionList {
    pub fn new(questions: Vec<Question>, current_category: impl Into<String>) -> Self {
        Self {
            total_questions: questions.len(),
            questions,
            current_category: current_category.into(),
        }
    }
}
