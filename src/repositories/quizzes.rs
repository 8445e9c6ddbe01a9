use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use time::PrimitiveDateTime;

use crate::db::models::{Quiz, QuizQuestion};

pub(crate) const COLUMNS: &str =
    "id, unit_id, title, pass_mark, is_published, created_by, created_at, updated_at";

const QUESTION_COLUMNS: &str = "\
    id, quiz_id, question_text, options, correct_answer, points, explanation, position, created_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!("SELECT {COLUMNS} FROM quizzes WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn fetch_one_by_id(pool: &PgPool, id: &str) -> Result<Quiz, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!("SELECT {COLUMNS} FROM quizzes WHERE id = $1"))
        .bind(id)
        .fetch_one(pool)
        .await
}

pub(crate) async fn list_by_unit(
    pool: &PgPool,
    unit_id: &str,
    published_only: bool,
) -> Result<Vec<Quiz>, sqlx::Error> {
    let filter = if published_only { " AND is_published" } else { "" };
    sqlx::query_as::<_, Quiz>(&format!(
        "SELECT {COLUMNS} FROM quizzes WHERE unit_id = $1{filter} ORDER BY created_at DESC"
    ))
    .bind(unit_id)
    .fetch_all(pool)
    .await
}

pub(crate) struct CreateQuiz<'a> {
    pub id: &'a str,
    pub unit_id: &'a str,
    pub title: &'a str,
    pub pass_mark: f64,
    pub created_by: &'a str,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    conn: &mut PgConnection,
    params: CreateQuiz<'_>,
) -> Result<Quiz, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!(
        "INSERT INTO quizzes (id, unit_id, title, pass_mark, is_published, created_by, created_at, updated_at)
         VALUES ($1,$2,$3,$4,FALSE,$5,$6,$7)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.unit_id)
    .bind(params.title)
    .bind(params.pass_mark)
    .bind(params.created_by)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(conn)
    .await
}

pub(crate) struct UpdateQuiz {
    pub title: Option<String>,
    pub pass_mark: Option<f64>,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn update(
    pool: &PgPool,
    id: &str,
    params: UpdateQuiz,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE quizzes SET
            title = COALESCE($1, title),
            pass_mark = COALESCE($2, pass_mark),
            updated_at = $3
         WHERE id = $4",
    )
    .bind(params.title)
    .bind(params.pass_mark)
    .bind(params.updated_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn publish(
    pool: &PgPool,
    id: &str,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE quizzes SET is_published = TRUE, updated_at = $1 WHERE id = $2")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) async fn delete_by_id(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM quizzes WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn touch(
    conn: &mut PgConnection,
    id: &str,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE quizzes SET updated_at = $1 WHERE id = $2")
        .bind(now)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

pub(crate) async fn list_questions(
    pool: &PgPool,
    quiz_id: &str,
) -> Result<Vec<QuizQuestion>, sqlx::Error> {
    sqlx::query_as::<_, QuizQuestion>(&format!(
        "SELECT {QUESTION_COLUMNS} FROM quiz_questions WHERE quiz_id = $1 ORDER BY position"
    ))
    .bind(quiz_id)
    .fetch_all(pool)
    .await
}

pub(crate) struct CreateQuizQuestion<'a> {
    pub id: &'a str,
    pub quiz_id: &'a str,
    pub question_text: &'a str,
    pub options: Vec<String>,
    pub correct_answer: &'a str,
    pub points: i32,
    pub explanation: Option<&'a str>,
    pub position: i32,
    pub created_at: PrimitiveDateTime,
}

pub(crate) async fn insert_question(
    conn: &mut PgConnection,
    params: CreateQuizQuestion<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO quiz_questions (
            id, quiz_id, question_text, options, correct_answer, points, explanation, position, created_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)",
    )
    .bind(params.id)
    .bind(params.quiz_id)
    .bind(params.question_text)
    .bind(Json(params.options))
    .bind(params.correct_answer)
    .bind(params.points)
    .bind(params.explanation)
    .bind(params.position)
    .bind(params.created_at)
    .execute(conn)
    .await?;
    Ok(())
}

pub(crate) async fn delete_questions(
    conn: &mut PgConnection,
    quiz_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM quiz_questions WHERE quiz_id = $1")
        .bind(quiz_id)
        .execute(conn)
        .await?;
    Ok(())
}
