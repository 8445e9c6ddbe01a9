use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::pagination::PageParams;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::catalog::{
    CampusCreate, CampusResponse, CampusUpdate, CourseCreate, CourseResponse,
};
use crate::services::authz::{can, Action};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_campuses).post(create_campus))
        .route(
            "/:campus_id",
            get(get_campus).patch(update_campus).delete(delete_campus),
        )
        .route("/:campus_id/courses", get(list_campus_courses).post(create_course))
}

async fn create_campus(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<CampusCreate>,
) -> Result<(StatusCode, Json<CampusResponse>), ApiError> {
    if !can(&user, Action::ManageCampuses) {
        return Err(ApiError::Forbidden("Admin access required"));
    }

    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let now = primitive_now_utc();
    let campus = repositories::campuses::create(
        state.db(),
        repositories::campuses::CreateCampus {
            id: &Uuid::new_v4().to_string(),
            name: &payload.name,
            city: payload.city.as_deref(),
            created_by: &user.id,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create campus"))?;

    Ok((StatusCode::CREATED, Json(CampusResponse::from_db(campus))))
}

async fn list_campuses(
    Query(params): Query<PageParams>,
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<CampusResponse>>, ApiError> {
    let campuses = repositories::campuses::list(state.db(), params.skip, params.limit)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list campuses"))?;

    Ok(Json(campuses.into_iter().map(CampusResponse::from_db).collect()))
}

async fn get_campus(
    Path(campus_id): Path<String>,
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<CampusResponse>, ApiError> {
    let campus = repositories::campuses::find_by_id(state.db(), &campus_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch campus"))?;

    let Some(campus) = campus else {
        return Err(ApiError::NotFound("Campus not found".to_string()));
    };

    Ok(Json(CampusResponse::from_db(campus)))
}

async fn update_campus(
    Path(campus_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<CampusUpdate>,
) -> Result<Json<CampusResponse>, ApiError> {
    if !can(&user, Action::ManageCampuses) {
        return Err(ApiError::Forbidden("Admin access required"));
    }

    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let campus = repositories::campuses::find_by_id(state.db(), &campus_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch campus"))?;

    let Some(_campus) = campus else {
        return Err(ApiError::NotFound("Campus not found".to_string()));
    };

    repositories::campuses::update(
        state.db(),
        &campus_id,
        repositories::campuses::UpdateCampus {
            name: payload.name,
            city: payload.city,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update campus"))?;

    let updated = repositories::campuses::find_by_id(state.db(), &campus_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated campus"))?
        .ok_or_else(|| ApiError::NotFound("Campus not found".to_string()))?;

    Ok(Json(CampusResponse::from_db(updated)))
}

async fn delete_campus(
    Path(campus_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    if !can(&user, Action::ManageCampuses) {
        return Err(ApiError::Forbidden("Admin access required"));
    }

    let deleted = repositories::campuses::delete_by_id(state.db(), &campus_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete campus"))?;

    if !deleted {
        return Err(ApiError::NotFound("Campus not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn create_course(
    Path(campus_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<CourseCreate>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    if !can(&user, Action::CreateCourseContent) {
        return Err(ApiError::Forbidden("Lecturer or admin access required"));
    }

    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let campus = repositories::campuses::find_by_id(state.db(), &campus_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch campus"))?;

    let Some(_campus) = campus else {
        return Err(ApiError::NotFound("Campus not found".to_string()));
    };

    let now = primitive_now_utc();
    let course = repositories::courses::create(
        state.db(),
        repositories::courses::CreateCourse {
            id: &Uuid::new_v4().to_string(),
            campus_id: &campus_id,
            code: &payload.code,
            title: &payload.title,
            description: payload.description.as_deref(),
            created_by: &user.id,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict("Course code already exists on this campus".to_string())
        } else {
            ApiError::internal(e, "Failed to create course")
        }
    })?;

    Ok((StatusCode::CREATED, Json(CourseResponse::from_db(course))))
}

async fn list_campus_courses(
    Path(campus_id): Path<String>,
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let campus = repositories::campuses::find_by_id(state.db(), &campus_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch campus"))?;

    let Some(_campus) = campus else {
        return Err(ApiError::NotFound("Campus not found".to_string()));
    };

    let courses = repositories::courses::list_by_campus(state.db(), &campus_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list courses"))?;

    Ok(Json(courses.into_iter().map(CourseResponse::from_db).collect()))
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}
