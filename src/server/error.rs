use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Why a handler could not produce its result.
#[derive(Debug, Error)]
pub enum TriviaError {
    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: i64 },

    #[error("invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// What the client sees. Every variant renders as
/// `{"success": false, "error": <code>, "message": <text>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("bad request")]
    BadRequest,
    #[error("resource not found")]
    NotFound,
    #[error("unprocessable")]
    Unprocessable,
    #[error("Server Error")]
    ServerError,
}

impl ApiError {
    pub fn status(self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub success: bool,
    pub error: u16,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ApiErrorBody {
            success: false,
            error: status.as_u16(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// Handlers without their own policy treat store failures as server errors.
impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        tracing::error!("Database error: {error}");
        ApiError::ServerError
    }
}

// Path parameters that don't parse never matched a route.
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::info!("Path rejected: {rejection}");
        ApiError::NotFound
    }
}

/// Collapses every [`TriviaError`] of a handler into a single client-facing status.
pub trait ResultExt<T> {
    fn or_unprocessable(self) -> Result<T, ApiError>;
    fn or_bad_request(self) -> Result<T, ApiError>;
}

impl<T> ResultExt<T> for Result<T, TriviaError> {
    fn or_unprocessable(self) -> Result<T, ApiError> {
        self.map_err(|err| flatten(err, ApiError::Unprocessable))
    }

    fn or_bad_request(self) -> Result<T, ApiError> {
        self.map_err(|err| flatten(err, ApiError::BadRequest))
    }
}

fn flatten(err: TriviaError, to: ApiError) -> ApiError {
    match &err {
        TriviaError::Database(_) => tracing::error!("Request failed: {err}"),
        _ => tracing::warn!("Request failed: {err}"),
    }
    to
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn renders_envelope() {
        let (status, body) = render(ApiError::Unprocessable).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body,
            serde_json::json!({"success": false, "error": 422, "message": "unprocessable"})
        );

        let (status, body) = render(ApiError::ServerError).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Server Error");
    }

    #[test]
    fn not_found_is_flattened_by_policy() {
        let missing: Result<(), TriviaError> = Err(TriviaError::NotFound {
            entity: "category",
            id: 399,
        });
        assert_eq!(missing.or_unprocessable(), Err(ApiError::Unprocessable));

        let missing: Result<(), TriviaError> = Err(TriviaError::MissingField("searchTerm"));
        assert_eq!(missing.or_bad_request(), Err(ApiError::BadRequest));
    }

    #[test]
    fn database_errors_default_to_server_error() {
        assert_eq!(ApiError::from(sqlx::Error::RowNotFound), ApiError::ServerError);
    }
}
