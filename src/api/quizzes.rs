use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use sqlx::PgConnection;
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::units::fetch_unit;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::Quiz;
use crate::repositories;
use crate::schemas::quiz::{
    AttemptDetailResponse, AttemptResponse, AttemptSubmit, QuizCreate, QuizQuestionCreate,
    QuizQuestionsReplace, QuizResponse, QuizResultsResponse, QuizSummaryResponse, QuizUpdate,
    ResultsSummaryResponse,
};
use crate::services::authz::{can, is_staff, Action};
use crate::services::grading;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/:quiz_id", get(get_quiz).patch(update_quiz).delete(delete_quiz))
        .route("/:quiz_id/questions", put(replace_questions))
        .route("/:quiz_id/publish", post(publish_quiz))
        .route("/:quiz_id/attempt", post(submit_attempt))
        .route("/:quiz_id/attempt/:attempt_id", get(get_attempt))
        .route("/:quiz_id/results", get(quiz_results))
}

pub(crate) async fn create_quiz(
    Path(unit_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<QuizCreate>,
) -> Result<(StatusCode, Json<QuizResponse>), ApiError> {
    if !can(&user, Action::CreateCourseContent) {
        return Err(ApiError::Forbidden("Lecturer or admin access required"));
    }

    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    validate_question_set(&payload.questions)?;

    let _unit = fetch_unit(&state, &unit_id).await?;

    let now = primitive_now_utc();
    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    let quiz = repositories::quizzes::create(
        &mut *tx,
        repositories::quizzes::CreateQuiz {
            id: &Uuid::new_v4().to_string(),
            unit_id: &unit_id,
            title: &payload.title,
            pass_mark: payload.pass_mark,
            created_by: &user.id,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create quiz"))?;

    insert_question_set(&mut tx, &quiz.id, &payload.questions).await?;
    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    let questions = repositories::quizzes::list_questions(state.db(), &quiz.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quiz questions"))?;

    Ok((StatusCode::CREATED, Json(QuizResponse::from_db(quiz, questions, true))))
}

pub(crate) async fn list_unit_quizzes(
    Path(unit_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<QuizSummaryResponse>>, ApiError> {
    let _unit = fetch_unit(&state, &unit_id).await?;

    let quizzes = repositories::quizzes::list_by_unit(state.db(), &unit_id, !is_staff(&user))
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list quizzes"))?;

    Ok(Json(quizzes.into_iter().map(QuizSummaryResponse::from_db).collect()))
}

async fn get_quiz(
    Path(quiz_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<QuizResponse>, ApiError> {
    let quiz = fetch_takeable_quiz(&state, &quiz_id, &user).await?;

    let questions = repositories::quizzes::list_questions(state.db(), &quiz.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quiz questions"))?;

    // Correct answers stay server-side until the caller can manage the quiz.
    let include_answers = can(&user, Action::ManageQuiz { creator: &quiz.created_by });

    Ok(Json(QuizResponse::from_db(quiz, questions, include_answers)))
}

async fn update_quiz(
    Path(quiz_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<QuizUpdate>,
) -> Result<Json<QuizResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let quiz = fetch_quiz(&state, &quiz_id).await?;

    if !can(&user, Action::ManageQuiz { creator: &quiz.created_by }) {
        return Err(ApiError::Forbidden("Not enough permissions for this quiz"));
    }

    repositories::quizzes::update(
        state.db(),
        &quiz_id,
        repositories::quizzes::UpdateQuiz {
            title: payload.title,
            pass_mark: payload.pass_mark,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update quiz"))?;

    let updated = repositories::quizzes::fetch_one_by_id(state.db(), &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated quiz"))?;
    let questions = repositories::quizzes::list_questions(state.db(), &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quiz questions"))?;

    Ok(Json(QuizResponse::from_db(updated, questions, true)))
}

/// Swaps the entire question set in one transaction; the questions of a
/// quiz are edited en masse, never row by row.
async fn replace_questions(
    Path(quiz_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<QuizQuestionsReplace>,
) -> Result<Json<QuizResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    validate_question_set(&payload.questions)?;

    let quiz = fetch_quiz(&state, &quiz_id).await?;

    if !can(&user, Action::ManageQuiz { creator: &quiz.created_by }) {
        return Err(ApiError::Forbidden("Not enough permissions for this quiz"));
    }

    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    repositories::quizzes::delete_questions(&mut tx, &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to clear quiz questions"))?;
    insert_question_set(&mut tx, &quiz_id, &payload.questions).await?;
    repositories::quizzes::touch(&mut tx, &quiz_id, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to touch quiz"))?;

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    let updated = repositories::quizzes::fetch_one_by_id(state.db(), &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated quiz"))?;
    let questions = repositories::quizzes::list_questions(state.db(), &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quiz questions"))?;

    Ok(Json(QuizResponse::from_db(updated, questions, true)))
}

async fn publish_quiz(
    Path(quiz_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<QuizSummaryResponse>, ApiError> {
    let quiz = fetch_quiz(&state, &quiz_id).await?;

    if !can(&user, Action::ManageQuiz { creator: &quiz.created_by }) {
        return Err(ApiError::Forbidden("Not enough permissions for this quiz"));
    }

    repositories::quizzes::publish(state.db(), &quiz_id, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to publish quiz"))?;

    let updated = repositories::quizzes::fetch_one_by_id(state.db(), &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated quiz"))?;

    Ok(Json(QuizSummaryResponse::from_db(updated)))
}

async fn delete_quiz(
    Path(quiz_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let quiz = fetch_quiz(&state, &quiz_id).await?;

    if !can(&user, Action::ManageQuiz { creator: &quiz.created_by }) {
        return Err(ApiError::Forbidden("Not enough permissions for this quiz"));
    }

    repositories::quizzes::delete_by_id(state.db(), &quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete quiz"))?;

    Ok(StatusCode::NO_CONTENT)
}

async fn submit_attempt(
    Path(quiz_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<AttemptSubmit>,
) -> Result<Json<AttemptResponse>, ApiError> {
    let quiz = fetch_takeable_quiz(&state, &quiz_id, &user).await?;

    let questions = repositories::quizzes::list_questions(state.db(), &quiz.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quiz questions"))?;

    let graded = grading::grade(&questions, &payload.answers, quiz.pass_mark);

    let attempt = repositories::quiz_attempts::create(
        state.db(),
        repositories::quiz_attempts::CreateAttempt {
            id: &Uuid::new_v4().to_string(),
            quiz_id: &quiz.id,
            user_id: &user.id,
            score: graded.score,
            passed: graded.passed,
            answers: payload.answers,
            time_taken: payload.time_taken.max(0),
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to record attempt"))?;

    tracing::info!(
        quiz_id = %quiz.id,
        user_id = %user.id,
        score = graded.score,
        passed = graded.passed,
        "Quiz attempt graded"
    );

    Ok(Json(AttemptResponse::from_db(attempt)))
}

async fn get_attempt(
    Path((quiz_id, attempt_id)): Path<(String, String)>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<AttemptDetailResponse>, ApiError> {
    let quiz = fetch_quiz(&state, &quiz_id).await?;

    let attempt = repositories::quiz_attempts::find_by_id(state.db(), &attempt_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch attempt"))?;

    let Some(attempt) = attempt else {
        return Err(ApiError::NotFound("Attempt not found".to_string()));
    };

    if attempt.quiz_id != quiz.id {
        return Err(ApiError::NotFound("Attempt not found".to_string()));
    }

    if !can(&user, Action::ViewAttempt { owner: &attempt.user_id }) {
        return Err(ApiError::Forbidden("You cannot view this attempt"));
    }

    let questions = repositories::quizzes::list_questions(state.db(), &quiz.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quiz questions"))?;

    // Post-submission review includes the correct answers and explanations.
    Ok(Json(AttemptDetailResponse {
        attempt: AttemptResponse::from_db(attempt),
        quiz: QuizResponse::from_db(quiz, questions, true),
    }))
}

async fn quiz_results(
    Path(quiz_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<QuizResultsResponse>, ApiError> {
    let quiz = fetch_quiz(&state, &quiz_id).await?;

    if !can(&user, Action::ViewQuizResults { creator: &quiz.created_by }) {
        return Err(ApiError::Forbidden("Only the quiz creator or an admin can view results"));
    }

    let attempts = repositories::quiz_attempts::list_by_quiz(state.db(), &quiz.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list attempts"))?;

    let summary = grading::summarize(&attempts);

    Ok(Json(QuizResultsResponse {
        attempts: attempts.into_iter().map(AttemptResponse::from_db).collect(),
        summary: ResultsSummaryResponse::from_summary(summary),
    }))
}

async fn fetch_quiz(state: &AppState, quiz_id: &str) -> Result<Quiz, ApiError> {
    repositories::quizzes::find_by_id(state.db(), quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz"))?
        .ok_or_else(|| ApiError::NotFound("Quiz not found".to_string()))
}

/// Unpublished quizzes are invisible to anyone who cannot manage them.
async fn fetch_takeable_quiz(
    state: &AppState,
    quiz_id: &str,
    user: &crate::db::models::User,
) -> Result<Quiz, ApiError> {
    let quiz = fetch_quiz(state, quiz_id).await?;

    if !quiz.is_published && !can(user, Action::ManageQuiz { creator: &quiz.created_by }) {
        return Err(ApiError::NotFound("Quiz not found".to_string()));
    }

    Ok(quiz)
}

fn validate_question_set(questions: &[QuizQuestionCreate]) -> Result<(), ApiError> {
    for question in questions {
        if !question.options.contains(&question.correct_answer) {
            return Err(ApiError::BadRequest(format!(
                "correct_answer must be one of the options for \"{}\"",
                question.question_text
            )));
        }
    }
    Ok(())
}

async fn insert_question_set(
    conn: &mut PgConnection,
    quiz_id: &str,
    questions: &[QuizQuestionCreate],
) -> Result<(), ApiError> {
    let now = primitive_now_utc();
    for (index, question) in questions.iter().enumerate() {
        repositories::quizzes::insert_question(
            conn,
            repositories::quizzes::CreateQuizQuestion {
                id: &Uuid::new_v4().to_string(),
                quiz_id,
                question_text: &question.question_text,
                options: question.options.clone(),
                correct_answer: &question.correct_answer,
                points: question.points,
                explanation: question.explanation.as_deref(),
                position: index as i32,
                created_at: now,
            },
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to insert quiz question"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests;
