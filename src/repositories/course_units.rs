use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::CourseUnit;

pub(crate) const COLUMNS: &str =
    "id, course_id, code, title, semester, created_by, created_at, updated_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<CourseUnit>, sqlx::Error> {
    sqlx::query_as::<_, CourseUnit>(&format!("SELECT {COLUMNS} FROM course_units WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_by_course(
    pool: &PgPool,
    course_id: &str,
) -> Result<Vec<CourseUnit>, sqlx::Error> {
    sqlx::query_as::<_, CourseUnit>(&format!(
        "SELECT {COLUMNS} FROM course_units WHERE course_id = $1 ORDER BY semester, code"
    ))
    .bind(course_id)
    .fetch_all(pool)
    .await
}

pub(crate) struct CreateCourseUnit<'a> {
    pub id: &'a str,
    pub course_id: &'a str,
    pub code: &'a str,
    pub title: &'a str,
    pub semester: i32,
    pub created_by: &'a str,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateCourseUnit<'_>,
) -> Result<CourseUnit, sqlx::Error> {
    sqlx::query_as::<_, CourseUnit>(&format!(
        "INSERT INTO course_units (id, course_id, code, title, semester, created_by, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.course_id)
    .bind(params.code)
    .bind(params.title)
    .bind(params.semester)
    .bind(params.created_by)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}
