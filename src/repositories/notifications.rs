use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Notification;
use crate::db::types::NotificationKind;

const COLUMNS: &str =
    "id, user_id, actor_id, kind, message, subject_id, is_read, created_at";

pub(crate) struct CreateNotification<'a> {
    pub id: &'a str,
    pub user_id: &'a str,
    pub actor_id: Option<&'a str>,
    pub kind: NotificationKind,
    pub message: &'a str,
    pub subject_id: Option<&'a str>,
    pub created_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateNotification<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO notifications (id, user_id, actor_id, kind, message, subject_id, is_read, created_at)
         VALUES ($1,$2,$3,$4,$5,$6,FALSE,$7)",
    )
    .bind(params.id)
    .bind(params.user_id)
    .bind(params.actor_id)
    .bind(params.kind)
    .bind(params.message)
    .bind(params.subject_id)
    .bind(params.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn list_by_user(
    pool: &PgPool,
    user_id: &str,
    skip: i64,
    limit: i64,
) -> Result<Vec<Notification>, sqlx::Error> {
    sqlx::query_as::<_, Notification>(&format!(
        "SELECT {COLUMNS} FROM notifications WHERE user_id = $1
         ORDER BY created_at DESC OFFSET $2 LIMIT $3"
    ))
    .bind(user_id)
    .bind(skip.max(0))
    .bind(limit.clamp(1, 1000))
    .fetch_all(pool)
    .await
}

pub(crate) async fn unread_count(pool: &PgPool, user_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND NOT is_read")
        .bind(user_id)
        .fetch_one(pool)
        .await
}

pub(crate) async fn mark_read(
    pool: &PgPool,
    id: &str,
    user_id: &str,
) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn mark_all_read(pool: &PgPool, user_id: &str) -> Result<u64, sqlx::Error> {
    let result =
        sqlx::query("UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND NOT is_read")
            .bind(user_id)
            .execute(pool)
            .await?;
    Ok(result.rows_affected())
}
