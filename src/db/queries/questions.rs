use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use crate::config::QuizOrder;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<i64>,
    pub difficulty: Option<i64>,
}

/// Question fields as submitted by a client; nothing is required.
#[derive(Debug, Default, Clone)]
pub struct NewQuestion {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<i64>,
    pub difficulty: Option<i64>,
}

const SELECT_QUESTIONS: &str = "SELECT id, question, answer, category, difficulty FROM questions";

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(&format!("{SELECT_QUESTIONS} ORDER BY id"))
        .fetch_all(pool)
        .await
}

pub async fn get_question(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(&format!("{SELECT_QUESTIONS} WHERE questions.id = ?1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category_id: i64,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(&format!(
        "{SELECT_QUESTIONS} WHERE questions.category = ?1 ORDER BY id"
    ))
    .bind(category_id)
    .fetch_all(pool)
    .await
}

/// Case-insensitive substring match on the question text. `%` and `_` in `term` match
/// themselves.
pub async fn search_questions(pool: &SqlitePool, term: &str) -> sqlx::Result<Vec<Question>> {
    // SQLite's lower() only folds ASCII, so case folding happens here.
    let needle = term.to_lowercase();
    Ok(get_all_questions(pool)
        .await?
        .into_iter()
        .filter(|q| {
            q.question
                .as_deref()
                .is_some_and(|text| text.to_lowercase().contains(&needle))
        })
        .collect())
}

pub async fn create_question(pool: &SqlitePool, new: &NewQuestion) -> sqlx::Result<i64> {
    let mut conn = pool.acquire().await?;

    let id = sqlx::query(
        r#"
        INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(&new.question)
    .bind(&new.answer)
    .bind(new.category)
    .bind(new.difficulty)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Returns whether a row was removed.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let removed = sqlx::query(
        r#"
        DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(removed > 0)
}

/// Picks a question that is not in `previous`, restricted to `category` when given.
pub async fn next_quiz_question(
    pool: &SqlitePool,
    category: Option<i64>,
    previous: &[i64],
    order: QuizOrder,
) -> sqlx::Result<Option<Question>> {
    let mut query = QueryBuilder::<Sqlite>::new(SELECT_QUESTIONS);
    query.push(" WHERE 1 = 1");
    if let Some(category) = category {
        query.push(" AND questions.category = ").push_bind(category);
    }
    if !previous.is_empty() {
        query.push(" AND questions.id NOT IN (");
        let mut ids = query.separated(", ");
        for id in previous {
            ids.push_bind(*id);
        }
        ids.push_unseparated(")");
    }
    query.push(match order {
        QuizOrder::First => " ORDER BY id",
        QuizOrder::Random => " ORDER BY RANDOM()",
    });
    query.push(" LIMIT 1");

    query.build_query_as::<Question>().fetch_optional(pool).await
}

async fn insert_question(pool: &SqlitePool, question: &Question) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO questions (id, question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(question.id)
    .bind(&question.question)
    .bind(&question.answer)
    .bind(question.category)
    .bind(question.difficulty)
    .execute(pool)
    .await?;
    Ok(())
}

async fn update_question(pool: &SqlitePool, question: &Question) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        UPDATE questions SET question = ?1, answer = ?2, category = ?3, difficulty = ?4 WHERE questions.id = ?5
        "#,
    )
    .bind(&question.question)
    .bind(&question.answer)
    .bind(question.category)
    .bind(question.difficulty)
    .bind(question.id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Makes the questions table match `questions` exactly, keeping ids. Admin tooling only,
/// the HTTP API never updates a question in place.
pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> sqlx::Result<()> {
    let existing_ids: HashSet<i64> = get_all_questions(pool)
        .await?
        .iter()
        .map(|q| q.id)
        .collect();
    let new_ids: HashSet<i64> = questions.iter().map(|q| q.id).collect();
    for id in existing_ids.difference(&new_ids) {
        delete_question(pool, *id).await?;
    }
    for question in questions {
        if existing_ids.contains(&question.id) {
            update_question(pool, &question).await?;
        } else {
            insert_question(pool, &question).await?;
        }
    }
    Ok(())
}
