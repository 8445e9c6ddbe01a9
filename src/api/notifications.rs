use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::pagination::PageParams;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::notification::{NotificationListResponse, NotificationResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/read-all", post(mark_all_read))
        .route("/:notification_id/read", post(mark_read))
}

async fn list_notifications(
    Query(params): Query<PageParams>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<NotificationListResponse>, ApiError> {
    let items =
        repositories::notifications::list_by_user(state.db(), &user.id, params.skip, params.limit)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list notifications"))?;

    let unread_count = repositories::notifications::unread_count(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count unread notifications"))?;

    Ok(Json(NotificationListResponse {
        items: items.into_iter().map(NotificationResponse::from_db).collect(),
        unread_count,
    }))
}

async fn mark_read(
    Path(notification_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let updated = repositories::notifications::mark_read(state.db(), &notification_id, &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to mark notification read"))?;

    if !updated {
        return Err(ApiError::NotFound("Notification not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "read": true })))
}

async fn mark_all_read(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let updated = repositories::notifications::mark_all_read(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to mark notifications read"))?;

    Ok(Json(serde_json::json!({ "updated": updated })))
}
