use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::pagination::PageParams;
use crate::api::units::fetch_unit;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::{NotificationKind, VoteDirection};
use crate::repositories;
use crate::schemas::qa::{
    AnswerCreate, AnswerResponse, QuestionCreate, QuestionDetailResponse, QuestionResponse,
    VoteRequest, VoteResponse,
};
use crate::services::notify;
use crate::services::votes::{self, VoteError, VoteSubject};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/:question_id", get(get_question))
        .route("/:question_id/answers", post(post_answer))
        .route("/:question_id/vote", patch(vote_question))
}

pub(crate) async fn create_question(
    Path(unit_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<QuestionCreate>,
) -> Result<(StatusCode, Json<QuestionResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let _unit = fetch_unit(&state, &unit_id).await?;

    let now = primitive_now_utc();
    let question = repositories::questions::create(
        state.db(),
        repositories::questions::CreateQuestion {
            id: &Uuid::new_v4().to_string(),
            unit_id: &unit_id,
            author_id: &user.id,
            title: &payload.title,
            body: &payload.body,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create question"))?;

    Ok((StatusCode::CREATED, Json(QuestionResponse::from_db(question))))
}

pub(crate) async fn list_unit_questions(
    Path(unit_id): Path<String>,
    Query(params): Query<PageParams>,
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<QuestionResponse>>, ApiError> {
    let _unit = fetch_unit(&state, &unit_id).await?;

    let questions =
        repositories::questions::list_by_unit(state.db(), &unit_id, params.skip, params.limit)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list questions"))?;

    Ok(Json(questions.into_iter().map(QuestionResponse::from_db).collect()))
}

async fn get_question(
    Path(question_id): Path<String>,
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<QuestionDetailResponse>, ApiError> {
    let question = repositories::questions::find_by_id(state.db(), &question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch question"))?;

    let Some(question) = question else {
        return Err(ApiError::NotFound("Question not found".to_string()));
    };

    let answers = repositories::answers::list_by_question(state.db(), &question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list answers"))?;

    Ok(Json(QuestionDetailResponse {
        question: QuestionResponse::from_db(question),
        answers: answers.into_iter().map(AnswerResponse::from_db).collect(),
    }))
}

async fn post_answer(
    Path(question_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<AnswerCreate>,
) -> Result<(StatusCode, Json<AnswerResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let question = repositories::questions::find_by_id(state.db(), &question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch question"))?;

    let Some(question) = question else {
        return Err(ApiError::NotFound("Question not found".to_string()));
    };

    let now = primitive_now_utc();
    let answer = repositories::answers::create(
        state.db(),
        repositories::answers::CreateAnswer {
            id: &Uuid::new_v4().to_string(),
            question_id: &question_id,
            author_id: &user.id,
            body: &payload.body,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create answer"))?;

    notify::deliver(
        state.db(),
        notify::Notify {
            recipient: &question.author_id,
            actor: Some(&user.id),
            kind: NotificationKind::AnswerPosted,
            message: format!("New answer on your question \"{}\"", question.title),
            subject_id: Some(&question.id),
        },
    )
    .await;

    Ok((StatusCode::CREATED, Json(AnswerResponse::from_db(answer))))
}

async fn vote_question(
    Path(question_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<VoteRequest>,
) -> Result<Json<VoteResponse>, ApiError> {
    cast_vote_on(&state, VoteSubject::Question, &question_id, &user.id, &payload).await
}

/// Shared by the question and answer vote endpoints.
pub(crate) async fn cast_vote_on(
    state: &AppState,
    subject: VoteSubject,
    subject_id: &str,
    user_id: &str,
    payload: &VoteRequest,
) -> Result<Json<VoteResponse>, ApiError> {
    let direction = VoteDirection::parse(&payload.direction).ok_or_else(|| {
        ApiError::BadRequest(format!("Invalid vote direction '{}'", payload.direction))
    })?;

    let outcome = votes::cast_vote(
        state.db(),
        subject,
        subject_id,
        user_id,
        direction,
        primitive_now_utc(),
    )
    .await
    .map_err(|err| match err {
        VoteError::SubjectNotFound => match subject {
            VoteSubject::Question => ApiError::NotFound("Question not found".to_string()),
            VoteSubject::Answer => ApiError::NotFound("Answer not found".to_string()),
        },
        VoteError::AlreadyVoted => ApiError::Conflict("Vote already recorded".to_string()),
        VoteError::Db(err) => ApiError::internal(err, "Failed to record vote"),
    })?;

    if outcome.created && direction == VoteDirection::Up {
        let noun = match subject {
            VoteSubject::Question => "question",
            VoteSubject::Answer => "answer",
        };
        notify::deliver(
            state.db(),
            notify::Notify {
                recipient: &outcome.author_id,
                actor: Some(user_id),
                kind: NotificationKind::VoteReceived,
                message: format!("Your {noun} received an upvote"),
                subject_id: Some(subject_id),
            },
        )
        .await;
    }

    Ok(Json(VoteResponse {
        up_votes: outcome.up_votes,
        down_votes: outcome.down_votes,
        voted: outcome.voted,
    }))
}

#[cfg(test)]
mod tests;
