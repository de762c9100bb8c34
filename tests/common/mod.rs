use std::path::Path;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;
use trivia_api::config::QuizOrder;
use trivia_api::db::{establish_connection, run_migrations};
use trivia_api::server::app::{router, AppState};
use trivia_api::transfer::import_dir;

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    _dir: TempDir,
}

impl TestApp {
    /// A fresh database holding the bundled trivia dataset.
    pub async fn seeded() -> Self {
        Self::seeded_with(QuizOrder::First).await
    }

    pub async fn seeded_with(quiz_order: QuizOrder) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let url = format!("sqlite:{}", dir.path().join("trivia.db").display());
        let pool = establish_connection(&url)
            .await
            .expect("failed to open database");
        run_migrations(&pool).await.expect("migrations failed");
        import_dir(&pool, &Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
            .await
            .expect("failed to seed database");

        TestApp {
            router: router(AppState::new(pool.clone(), quiz_order)),
            pool,
            _dir: dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let resp = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        (status, body.to_vec())
    }

    async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = self.send(request).await;
        let json = serde_json::from_slice(&body).expect("response body was not json");
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send_json(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send_json(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send_json(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("failed to build request"),
        )
        .await
    }

    /// A POST with no body and no content type.
    pub async fn post_empty(&self, uri: &str) -> (StatusCode, Value) {
        self.send_json(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
    }
}

pub fn ids(questions: &Value) -> Vec<i64> {
    questions
        .as_array()
        .expect("questions is not an array")
        .iter()
        .map(|q| q["id"].as_i64().expect("question id is not a number"))
        .collect()
}
