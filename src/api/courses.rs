use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::campuses::is_unique_violation;
use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::Course;
use crate::repositories;
use crate::schemas::catalog::{
    CourseResponse, CourseUnitCreate, CourseUnitResponse, CourseUpdate,
};
use crate::services::authz::{can, Action};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/:course_id",
            get(get_course).patch(update_course).delete(delete_course),
        )
        .route("/:course_id/units", get(list_course_units).post(create_unit))
}

async fn get_course(
    Path(course_id): Path<String>,
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<CourseResponse>, ApiError> {
    let course = fetch_course(&state, &course_id).await?;
    Ok(Json(CourseResponse::from_db(course)))
}

async fn update_course(
    Path(course_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<CourseUpdate>,
) -> Result<Json<CourseResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let course = fetch_course(&state, &course_id).await?;

    if !can(&user, Action::ManageCourse { creator: &course.created_by }) {
        return Err(ApiError::Forbidden("Not enough permissions for this course"));
    }

    repositories::courses::update(
        state.db(),
        &course_id,
        repositories::courses::UpdateCourse {
            title: payload.title,
            description: payload.description,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update course"))?;

    let updated = fetch_course(&state, &course_id).await?;
    Ok(Json(CourseResponse::from_db(updated)))
}

async fn delete_course(
    Path(course_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let course = fetch_course(&state, &course_id).await?;

    if !can(&user, Action::ManageCourse { creator: &course.created_by }) {
        return Err(ApiError::Forbidden("Not enough permissions for this course"));
    }

    repositories::courses::delete_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete course"))?;

    Ok(StatusCode::NO_CONTENT)
}

async fn create_unit(
    Path(course_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<CourseUnitCreate>,
) -> Result<(StatusCode, Json<CourseUnitResponse>), ApiError> {
    if !can(&user, Action::CreateCourseContent) {
        return Err(ApiError::Forbidden("Lecturer or admin access required"));
    }

    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let _course = fetch_course(&state, &course_id).await?;

    let now = primitive_now_utc();
    let unit = repositories::course_units::create(
        state.db(),
        repositories::course_units::CreateCourseUnit {
            id: &Uuid::new_v4().to_string(),
            course_id: &course_id,
            code: &payload.code,
            title: &payload.title,
            semester: payload.semester,
            created_by: &user.id,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict("Unit code already exists in this course".to_string())
        } else {
            ApiError::internal(e, "Failed to create course unit")
        }
    })?;

    Ok((StatusCode::CREATED, Json(CourseUnitResponse::from_db(unit))))
}

async fn list_course_units(
    Path(course_id): Path<String>,
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseUnitResponse>>, ApiError> {
    let _course = fetch_course(&state, &course_id).await?;

    let units = repositories::course_units::list_by_course(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list course units"))?;

    Ok(Json(units.into_iter().map(CourseUnitResponse::from_db).collect()))
}

async fn fetch_course(state: &AppState, course_id: &str) -> Result<Course, ApiError> {
    repositories::courses::find_by_id(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))
}
