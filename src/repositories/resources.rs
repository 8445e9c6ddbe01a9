use sqlx::{PgPool, Postgres, QueryBuilder};
use time::PrimitiveDateTime;

use crate::db::models::Resource;
use crate::db::types::ResourceStatus;

pub(crate) const COLUMNS: &str = "\
    id, unit_id, uploader_id, title, description, file_url, status, \
    reviewed_by, reviewed_at, created_at, updated_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Resource>, sqlx::Error> {
    sqlx::query_as::<_, Resource>(&format!("SELECT {COLUMNS} FROM resources WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_by_unit(
    pool: &PgPool,
    unit_id: &str,
    status: Option<ResourceStatus>,
) -> Result<Vec<Resource>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {COLUMNS} FROM resources WHERE unit_id = "
    ));
    builder.push_bind(unit_id);

    if let Some(status) = status {
        builder.push(" AND status = ");
        builder.push_bind(status);
    }

    builder.push(" ORDER BY created_at DESC");

    builder.build_query_as::<Resource>().fetch_all(pool).await
}

pub(crate) struct CreateResource<'a> {
    pub id: &'a str,
    pub unit_id: &'a str,
    pub uploader_id: &'a str,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub file_url: &'a str,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateResource<'_>,
) -> Result<Resource, sqlx::Error> {
    sqlx::query_as::<_, Resource>(&format!(
        "INSERT INTO resources (id, unit_id, uploader_id, title, description, file_url, status, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.unit_id)
    .bind(params.uploader_id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.file_url)
    .bind(ResourceStatus::Pending)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn set_review(
    pool: &PgPool,
    id: &str,
    status: ResourceStatus,
    reviewed_by: &str,
    now: PrimitiveDateTime,
) -> Result<Resource, sqlx::Error> {
    sqlx::query_as::<_, Resource>(&format!(
        "UPDATE resources
         SET status = $1, reviewed_by = $2, reviewed_at = $3, updated_at = $3
         WHERE id = $4
         RETURNING {COLUMNS}",
    ))
    .bind(status)
    .bind(reviewed_by)
    .bind(now)
    .bind(id)
    .fetch_one(pool)
    .await
}

pub(crate) async fn delete_by_id(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM resources WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
