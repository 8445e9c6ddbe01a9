use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Resource;

const JOINED_RESOURCE_COLUMNS: &str = "\
    r.id, r.unit_id, r.uploader_id, r.title, r.description, r.file_url, r.status, \
    r.reviewed_by, r.reviewed_at, r.created_at, r.updated_at";

pub(crate) async fn insert(
    pool: &PgPool,
    resource_id: &str,
    user_id: &str,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO bookmarks (resource_id, user_id, created_at)
         VALUES ($1, $2, $3)
         ON CONFLICT (resource_id, user_id) DO NOTHING",
    )
    .bind(resource_id)
    .bind(user_id)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn delete(
    pool: &PgPool,
    resource_id: &str,
    user_id: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM bookmarks WHERE resource_id = $1 AND user_id = $2")
        .bind(resource_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn list_resources_for_user(
    pool: &PgPool,
    user_id: &str,
) -> Result<Vec<Resource>, sqlx::Error> {
    sqlx::query_as::<_, Resource>(&format!(
        "SELECT {JOINED_RESOURCE_COLUMNS}
         FROM resources r
         JOIN bookmarks b ON b.resource_id = r.id
         WHERE b.user_id = $1
         ORDER BY b.created_at DESC",
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}
