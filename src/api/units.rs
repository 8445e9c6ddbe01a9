use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::{questions, quizzes, resources};
use crate::core::state::AppState;
use crate::db::models::CourseUnit;
use crate::repositories;
use crate::schemas::catalog::CourseUnitResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/:unit_id", get(get_unit))
        .route(
            "/:unit_id/resources",
            get(resources::list_unit_resources).post(resources::create_resource),
        )
        .route(
            "/:unit_id/quizzes",
            get(quizzes::list_unit_quizzes).post(quizzes::create_quiz),
        )
        .route(
            "/:unit_id/questions",
            get(questions::list_unit_questions).post(questions::create_question),
        )
}

async fn get_unit(
    Path(unit_id): Path<String>,
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<CourseUnitResponse>, ApiError> {
    let unit = fetch_unit(&state, &unit_id).await?;
    Ok(Json(CourseUnitResponse::from_db(unit)))
}

pub(crate) async fn fetch_unit(state: &AppState, unit_id: &str) -> Result<CourseUnit, ApiError> {
    repositories::course_units::find_by_id(state.db(), unit_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course unit"))?
        .ok_or_else(|| ApiError::NotFound("Course unit not found".to_string()))
}
