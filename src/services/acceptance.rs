use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::repositories;

/// Marks one answer as the accepted answer of its question.
///
/// Runs clear-then-set inside a single transaction so at most one answer
/// per question carries `is_accepted` at any observable point: any other
/// accepted answer is cleared, the chosen answer is set, and the question
/// is flagged resolved. Re-accepting a different answer re-runs the same
/// transition; accepting the already-accepted answer is a no-op rewrite.
/// Notifying the answer author happens outside this transaction.
pub(crate) async fn accept(
    pool: &PgPool,
    question_id: &str,
    answer_id: &str,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    repositories::answers::clear_accepted_except(&mut tx, question_id, answer_id, now).await?;
    repositories::answers::mark_accepted(&mut tx, answer_id, now).await?;
    repositories::questions::mark_resolved(&mut tx, question_id, now).await?;

    tx.commit().await
}
