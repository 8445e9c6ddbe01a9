use sqlx::PgPool;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::types::NotificationKind;
use crate::repositories;

pub(crate) struct Notify<'a> {
    pub(crate) recipient: &'a str,
    pub(crate) actor: Option<&'a str>,
    pub(crate) kind: NotificationKind,
    pub(crate) message: String,
    pub(crate) subject_id: Option<&'a str>,
}

/// Fire-and-forget delivery: the triggering mutation has already
/// committed, so a failed insert is logged and swallowed. Self-directed
/// notifications are skipped.
pub(crate) async fn deliver(pool: &PgPool, notify: Notify<'_>) {
    if notify.actor == Some(notify.recipient) {
        return;
    }

    let result = repositories::notifications::create(
        pool,
        repositories::notifications::CreateNotification {
            id: &Uuid::new_v4().to_string(),
            user_id: notify.recipient,
            actor_id: notify.actor,
            kind: notify.kind,
            message: &notify.message,
            subject_id: notify.subject_id,
            created_at: primitive_now_utc(),
        },
    )
    .await;

    if let Err(err) = result {
        tracing::warn!(
            error = %err,
            recipient = %notify.recipient,
            kind = ?notify.kind,
            "Failed to deliver notification"
        );
    }
}
