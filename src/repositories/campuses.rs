use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Campus;

pub(crate) const COLUMNS: &str = "id, name, city, created_by, created_at, updated_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Campus>, sqlx::Error> {
    sqlx::query_as::<_, Campus>(&format!("SELECT {COLUMNS} FROM campuses WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list(
    pool: &PgPool,
    skip: i64,
    limit: i64,
) -> Result<Vec<Campus>, sqlx::Error> {
    sqlx::query_as::<_, Campus>(&format!(
        "SELECT {COLUMNS} FROM campuses ORDER BY name OFFSET $1 LIMIT $2"
    ))
    .bind(skip.max(0))
    .bind(limit.clamp(1, 1000))
    .fetch_all(pool)
    .await
}

pub(crate) struct CreateCampus<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub city: Option<&'a str>,
    pub created_by: &'a str,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateCampus<'_>,
) -> Result<Campus, sqlx::Error> {
    sqlx::query_as::<_, Campus>(&format!(
        "INSERT INTO campuses (id, name, city, created_by, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5,$6)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.name)
    .bind(params.city)
    .bind(params.created_by)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) struct UpdateCampus {
    pub name: Option<String>,
    pub city: Option<String>,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn update(
    pool: &PgPool,
    id: &str,
    params: UpdateCampus,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE campuses SET
            name = COALESCE($1, name),
            city = COALESCE($2, city),
            updated_at = $3
         WHERE id = $4",
    )
    .bind(params.name)
    .bind(params.city)
    .bind(params.updated_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn delete_by_id(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM campuses WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
