use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Answer, Question};
use crate::db::types::VoteDirection;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuestionCreate {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[validate(length(min = 1, message = "body must not be empty"))]
    pub(crate) body: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AnswerCreate {
    #[validate(length(min = 1, message = "body must not be empty"))]
    pub(crate) body: String,
}

/// Direction arrives as a plain string so an unknown value maps to 400
/// instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub(crate) struct VoteRequest {
    pub(crate) direction: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct VoteResponse {
    pub(crate) up_votes: i32,
    pub(crate) down_votes: i32,
    pub(crate) voted: Option<VoteDirection>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionResponse {
    pub(crate) id: String,
    pub(crate) unit_id: String,
    pub(crate) author_id: String,
    pub(crate) title: String,
    pub(crate) body: String,
    pub(crate) up_votes: i32,
    pub(crate) down_votes: i32,
    pub(crate) is_resolved: bool,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl QuestionResponse {
    pub(crate) fn from_db(question: Question) -> Self {
        Self {
            id: question.id,
            unit_id: question.unit_id,
            author_id: question.author_id,
            title: question.title,
            body: question.body,
            up_votes: question.up_votes,
            down_votes: question.down_votes,
            is_resolved: question.is_resolved,
            created_at: format_primitive(question.created_at),
            updated_at: format_primitive(question.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswerResponse {
    pub(crate) id: String,
    pub(crate) question_id: String,
    pub(crate) author_id: String,
    pub(crate) body: String,
    pub(crate) up_votes: i32,
    pub(crate) down_votes: i32,
    pub(crate) is_accepted: bool,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl AnswerResponse {
    pub(crate) fn from_db(answer: Answer) -> Self {
        Self {
            id: answer.id,
            question_id: answer.question_id,
            author_id: answer.author_id,
            body: answer.body,
            up_votes: answer.up_votes,
            down_votes: answer.down_votes,
            is_accepted: answer.is_accepted,
            created_at: format_primitive(answer.created_at),
            updated_at: format_primitive(answer.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionDetailResponse {
    pub(crate) question: QuestionResponse,
    pub(crate) answers: Vec<AnswerResponse>,
}
