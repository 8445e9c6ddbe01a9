use sqlx::PgConnection;
use time::PrimitiveDateTime;

use crate::db::types::VoteDirection;
use crate::services::votes::VoteSubject;

/// Author of the voted-on row, or None when the subject does not exist.
pub(crate) async fn subject_author(
    conn: &mut PgConnection,
    subject: VoteSubject,
    subject_id: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(&format!(
        "SELECT author_id FROM {} WHERE id = $1",
        subject.subject_table()
    ))
    .bind(subject_id)
    .fetch_optional(conn)
    .await
}

/// Locks the caller's ledger row for the rest of the transaction so two
/// requests from the same user serialize instead of double-applying.
pub(crate) async fn find_direction_for_update(
    conn: &mut PgConnection,
    subject: VoteSubject,
    subject_id: &str,
    user_id: &str,
) -> Result<Option<VoteDirection>, sqlx::Error> {
    sqlx::query_scalar::<_, VoteDirection>(&format!(
        "SELECT direction FROM {} WHERE {} = $1 AND user_id = $2 FOR UPDATE",
        subject.vote_table(),
        subject.subject_column()
    ))
    .bind(subject_id)
    .bind(user_id)
    .fetch_optional(conn)
    .await
}

pub(crate) async fn insert(
    conn: &mut PgConnection,
    subject: VoteSubject,
    subject_id: &str,
    user_id: &str,
    direction: VoteDirection,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(&format!(
        "INSERT INTO {} ({}, user_id, direction, created_at) VALUES ($1, $2, $3, $4)",
        subject.vote_table(),
        subject.subject_column()
    ))
    .bind(subject_id)
    .bind(user_id)
    .bind(direction)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(())
}

pub(crate) async fn delete(
    conn: &mut PgConnection,
    subject: VoteSubject,
    subject_id: &str,
    user_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(&format!(
        "DELETE FROM {} WHERE {} = $1 AND user_id = $2",
        subject.vote_table(),
        subject.subject_column()
    ))
    .bind(subject_id)
    .bind(user_id)
    .execute(conn)
    .await?;
    Ok(())
}

pub(crate) async fn set_direction(
    conn: &mut PgConnection,
    subject: VoteSubject,
    subject_id: &str,
    user_id: &str,
    direction: VoteDirection,
) -> Result<(), sqlx::Error> {
    sqlx::query(&format!(
        "UPDATE {} SET direction = $1 WHERE {} = $2 AND user_id = $3",
        subject.vote_table(),
        subject.subject_column()
    ))
    .bind(direction)
    .bind(subject_id)
    .bind(user_id)
    .execute(conn)
    .await?;
    Ok(())
}

/// Moves both counters in one atomic statement and returns the new values.
pub(crate) async fn apply_counter_deltas(
    conn: &mut PgConnection,
    subject: VoteSubject,
    subject_id: &str,
    up_delta: i32,
    down_delta: i32,
    now: PrimitiveDateTime,
) -> Result<(i32, i32), sqlx::Error> {
    sqlx::query_as::<_, (i32, i32)>(&format!(
        "UPDATE {} SET up_votes = up_votes + $1, down_votes = down_votes + $2, updated_at = $3
         WHERE id = $4
         RETURNING up_votes, down_votes",
        subject.subject_table()
    ))
    .bind(up_delta)
    .bind(down_delta)
    .bind(now)
    .bind(subject_id)
    .fetch_one(conn)
    .await
}
