use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::units::fetch_unit;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::{Resource, User};
use crate::db::types::{NotificationKind, ResourceStatus};
use crate::repositories;
use crate::schemas::resource::{ResourceCreate, ResourceResponse, ResourceReview};
use crate::services::authz::{can, is_staff, Action};
use crate::services::notify;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/bookmarked", get(list_bookmarked))
        .route("/:resource_id", get(get_resource).delete(delete_resource))
        .route("/:resource_id/review", patch(review_resource))
        .route("/:resource_id/bookmark", post(toggle_bookmark))
}

pub(crate) async fn create_resource(
    Path(unit_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<ResourceCreate>,
) -> Result<(StatusCode, Json<ResourceResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let _unit = fetch_unit(&state, &unit_id).await?;

    let now = primitive_now_utc();
    let resource = repositories::resources::create(
        state.db(),
        repositories::resources::CreateResource {
            id: &Uuid::new_v4().to_string(),
            unit_id: &unit_id,
            uploader_id: &user.id,
            title: &payload.title,
            description: payload.description.as_deref(),
            file_url: &payload.file_url,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create resource"))?;

    Ok((StatusCode::CREATED, Json(ResourceResponse::from_db(resource))))
}

pub(crate) async fn list_unit_resources(
    Path(unit_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ResourceResponse>>, ApiError> {
    let _unit = fetch_unit(&state, &unit_id).await?;

    // Students only browse the approved catalog; staff see the review queue too.
    let status_filter = if is_staff(&user) { None } else { Some(ResourceStatus::Approved) };

    let resources = repositories::resources::list_by_unit(state.db(), &unit_id, status_filter)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list resources"))?;

    Ok(Json(resources.into_iter().map(ResourceResponse::from_db).collect()))
}

async fn get_resource(
    Path(resource_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<ResourceResponse>, ApiError> {
    let resource = fetch_visible_resource(&state, &resource_id, &user).await?;
    Ok(Json(ResourceResponse::from_db(resource)))
}

async fn review_resource(
    Path(resource_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<ResourceReview>,
) -> Result<Json<ResourceResponse>, ApiError> {
    if !can(&user, Action::ReviewResource) {
        return Err(ApiError::Forbidden("Lecturer or admin access required"));
    }

    let (status, kind) = match payload.decision.as_str() {
        "approve" => (ResourceStatus::Approved, NotificationKind::ResourceApproved),
        "reject" => (ResourceStatus::Rejected, NotificationKind::ResourceRejected),
        other => {
            return Err(ApiError::BadRequest(format!("Invalid review decision '{other}'")));
        }
    };

    let resource = repositories::resources::find_by_id(state.db(), &resource_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch resource"))?;

    let Some(resource) = resource else {
        return Err(ApiError::NotFound("Resource not found".to_string()));
    };

    let updated = repositories::resources::set_review(
        state.db(),
        &resource_id,
        status,
        &user.id,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to review resource"))?;

    let verdict = if status == ResourceStatus::Approved { "approved" } else { "rejected" };
    notify::deliver(
        state.db(),
        notify::Notify {
            recipient: &resource.uploader_id,
            actor: Some(&user.id),
            kind,
            message: format!("Your resource \"{}\" was {verdict}", resource.title),
            subject_id: Some(&resource.id),
        },
    )
    .await;

    Ok(Json(ResourceResponse::from_db(updated)))
}

async fn delete_resource(
    Path(resource_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let resource = repositories::resources::find_by_id(state.db(), &resource_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch resource"))?;

    let Some(resource) = resource else {
        return Err(ApiError::NotFound("Resource not found".to_string()));
    };

    if !can(&user, Action::DeleteResource { uploader: &resource.uploader_id }) {
        return Err(ApiError::Forbidden("You cannot delete this resource"));
    }

    repositories::resources::delete_by_id(state.db(), &resource_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete resource"))?;

    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_bookmark(
    Path(resource_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let _resource = fetch_visible_resource(&state, &resource_id, &user).await?;

    let removed = repositories::bookmarks::delete(state.db(), &resource_id, &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to toggle bookmark"))?;

    if !removed {
        repositories::bookmarks::insert(state.db(), &resource_id, &user.id, primitive_now_utc())
            .await
            .map_err(|e| ApiError::internal(e, "Failed to toggle bookmark"))?;
    }

    Ok(Json(serde_json::json!({ "bookmarked": !removed })))
}

async fn list_bookmarked(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ResourceResponse>>, ApiError> {
    let resources = repositories::bookmarks::list_resources_for_user(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list bookmarks"))?;

    Ok(Json(resources.into_iter().map(ResourceResponse::from_db).collect()))
}

/// Unapproved resources stay invisible to everyone but their uploader and
/// staff; a hidden row answers NotFound rather than Forbidden.
async fn fetch_visible_resource(
    state: &AppState,
    resource_id: &str,
    user: &User,
) -> Result<Resource, ApiError> {
    let resource = repositories::resources::find_by_id(state.db(), resource_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch resource"))?;

    let Some(resource) = resource else {
        return Err(ApiError::NotFound("Resource not found".to_string()));
    };

    let visible = resource.status == ResourceStatus::Approved
        || resource.uploader_id == user.id
        || is_staff(user);

    if !visible {
        return Err(ApiError::NotFound("Resource not found".to_string()));
    }

    Ok(resource)
}
