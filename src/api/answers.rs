use axum::{
    extract::{Path, State},
    routing::patch,
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::questions::cast_vote_on;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::NotificationKind;
use crate::repositories;
use crate::schemas::qa::{AnswerResponse, VoteRequest, VoteResponse};
use crate::services::acceptance;
use crate::services::authz::{can, Action};
use crate::services::notify;
use crate::services::votes::VoteSubject;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/:answer_id/vote", patch(vote_answer))
        .route("/:answer_id/accept", patch(accept_answer))
}

async fn vote_answer(
    Path(answer_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<VoteRequest>,
) -> Result<Json<VoteResponse>, ApiError> {
    cast_vote_on(&state, VoteSubject::Answer, &answer_id, &user.id, &payload).await
}

async fn accept_answer(
    Path(answer_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let answer = repositories::answers::find_by_id(state.db(), &answer_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch answer"))?;

    let Some(answer) = answer else {
        return Err(ApiError::NotFound("Answer not found".to_string()));
    };

    let question = repositories::questions::fetch_one_by_id(state.db(), &answer.question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch question"))?;

    if !can(&user, Action::AcceptAnswer { question_author: &question.author_id }) {
        return Err(ApiError::Forbidden("You cannot accept answers on this question"));
    }

    acceptance::accept(state.db(), &question.id, &answer.id, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to accept answer"))?;

    // Acceptance has committed; notification failure must not undo it.
    notify::deliver(
        state.db(),
        notify::Notify {
            recipient: &answer.author_id,
            actor: Some(&user.id),
            kind: NotificationKind::AnswerAccepted,
            message: format!("Your answer on \"{}\" was accepted", question.title),
            subject_id: Some(&answer.id),
        },
    )
    .await;

    let updated = repositories::answers::fetch_one_by_id(state.db(), &answer_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated answer"))?;

    Ok(Json(AnswerResponse::from_db(updated)))
}
