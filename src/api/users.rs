use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::api::pagination::default_limit;
use crate::api::validation::validate_password_len;
use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::User;
use crate::db::types::{ResourceStatus, UserRole};
use crate::repositories;
use crate::schemas::user::{AdminUserUpdate, PlatformOverview, UserResponse};

#[derive(Debug, Deserialize)]
pub(crate) struct UserListQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    role: Option<UserRole>,
    #[serde(default)]
    #[serde(alias = "isActive")]
    is_active: Option<bool>,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/overview", get(overview))
        .route("/:user_id", get(get_user).patch(update_user))
}

async fn list_users(
    Query(params): Query<UserListQuery>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "SELECT id, username, hashed_password, full_name, role, is_active, created_at, updated_at
         FROM users",
    );
    let mut has_where = false;

    if let Some(username) = params.username.as_ref() {
        builder.push(" WHERE ");
        has_where = true;
        builder.push("username = ");
        builder.push_bind(username);
    }
    if let Some(role) = params.role {
        builder.push(if has_where { " AND " } else { " WHERE " });
        has_where = true;
        builder.push("role = ");
        builder.push_bind(role);
    }
    if let Some(is_active) = params.is_active {
        builder.push(if has_where { " AND " } else { " WHERE " });
        builder.push("is_active = ");
        builder.push_bind(is_active);
    }

    builder.push(" ORDER BY created_at DESC");
    builder.push(" OFFSET ");
    builder.push_bind(params.skip.max(0));
    builder.push(" LIMIT ");
    builder.push_bind(params.limit.clamp(1, 1000));

    let users = builder
        .build_query_as::<User>()
        .fetch_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list users"))?;

    Ok(Json(users.into_iter().map(UserResponse::from_db).collect()))
}

async fn get_user(
    Path(user_id): Path<String>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = repositories::users::find_by_id(state.db(), &user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch user"))?;

    let Some(user) = user else {
        return Err(ApiError::NotFound("User not found".to_string()));
    };

    Ok(Json(UserResponse::from_db(user)))
}

async fn update_user(
    Path(user_id): Path<String>,
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<AdminUserUpdate>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = repositories::users::find_by_id(state.db(), &user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch user"))?;

    let Some(_user) = user else {
        return Err(ApiError::NotFound("User not found".to_string()));
    };

    let hashed_password = if let Some(password) = payload.password.as_ref() {
        validate_password_len(password)?;
        Some(
            security::hash_password(password)
                .map_err(|e| ApiError::internal(e, "Failed to hash password"))?,
        )
    } else {
        None
    };

    repositories::users::update(
        state.db(),
        &user_id,
        repositories::users::UpdateUser {
            full_name: payload.full_name,
            role: payload.role,
            is_active: payload.is_active,
            hashed_password,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update user"))?;

    let updated = repositories::users::fetch_one_by_id(state.db(), &user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated user"))?;

    tracing::info!(
        admin_id = %admin.id,
        user_id = %updated.id,
        action = "user_update",
        "Admin updated user"
    );

    Ok(Json(UserResponse::from_db(updated)))
}

async fn overview(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<PlatformOverview>, ApiError> {
    let users = count(&state, "SELECT COUNT(*) FROM users").await?;
    let campuses = count(&state, "SELECT COUNT(*) FROM campuses").await?;
    let courses = count(&state, "SELECT COUNT(*) FROM courses").await?;
    let course_units = count(&state, "SELECT COUNT(*) FROM course_units").await?;
    let quizzes = count(&state, "SELECT COUNT(*) FROM quizzes").await?;
    let questions = count(&state, "SELECT COUNT(*) FROM questions").await?;

    let pending_resources =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM resources WHERE status = $1")
            .bind(ResourceStatus::Pending)
            .fetch_one(state.db())
            .await
            .map_err(|e| ApiError::internal(e, "Failed to count pending resources"))?;

    Ok(Json(PlatformOverview {
        users,
        campuses,
        courses,
        course_units,
        pending_resources,
        quizzes,
        questions,
    }))
}

async fn count(state: &AppState, query: &str) -> Result<i64, ApiError> {
    sqlx::query_scalar::<_, i64>(query)
        .fetch_one(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to compute overview counts"))
}
