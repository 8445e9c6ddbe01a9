use std::collections::HashMap;

use sqlx::types::Json;
use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::QuizAttempt;

const COLUMNS: &str = "id, quiz_id, user_id, score, passed, answers, time_taken, created_at";

pub(crate) struct CreateAttempt<'a> {
    pub id: &'a str,
    pub quiz_id: &'a str,
    pub user_id: &'a str,
    pub score: f64,
    pub passed: bool,
    pub answers: HashMap<String, String>,
    pub time_taken: i32,
    pub created_at: PrimitiveDateTime,
}

/// Attempts are append-only; there is deliberately no update here.
pub(crate) async fn create(
    pool: &PgPool,
    params: CreateAttempt<'_>,
) -> Result<QuizAttempt, sqlx::Error> {
    sqlx::query_as::<_, QuizAttempt>(&format!(
        "INSERT INTO quiz_attempts (id, quiz_id, user_id, score, passed, answers, time_taken, created_at)
         VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.quiz_id)
    .bind(params.user_id)
    .bind(params.score)
    .bind(params.passed)
    .bind(Json(params.answers))
    .bind(params.time_taken)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<QuizAttempt>, sqlx::Error> {
    sqlx::query_as::<_, QuizAttempt>(&format!(
        "SELECT {COLUMNS} FROM quiz_attempts WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_by_quiz(
    pool: &PgPool,
    quiz_id: &str,
) -> Result<Vec<QuizAttempt>, sqlx::Error> {
    sqlx::query_as::<_, QuizAttempt>(&format!(
        "SELECT {COLUMNS} FROM quiz_attempts WHERE quiz_id = $1 ORDER BY created_at DESC"
    ))
    .bind(quiz_id)
    .fetch_all(pool)
    .await
}
