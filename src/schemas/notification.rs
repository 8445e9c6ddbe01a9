use serde::Serialize;

use crate::core::time::format_primitive;
use crate::db::models::Notification;
use crate::db::types::NotificationKind;

#[derive(Debug, Serialize)]
pub(crate) struct NotificationResponse {
    pub(crate) id: String,
    pub(crate) kind: NotificationKind,
    pub(crate) message: String,
    pub(crate) actor_id: Option<String>,
    pub(crate) subject_id: Option<String>,
    pub(crate) is_read: bool,
    pub(crate) created_at: String,
}

impl NotificationResponse {
    pub(crate) fn from_db(notification: Notification) -> Self {
        Self {
            id: notification.id,
            kind: notification.kind,
            message: notification.message,
            actor_id: notification.actor_id,
            subject_id: notification.subject_id,
            is_read: notification.is_read,
            created_at: format_primitive(notification.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct NotificationListResponse {
    pub(crate) items: Vec<NotificationResponse>,
    pub(crate) unread_count: i64,
}
