use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Quiz, QuizAttempt, QuizQuestion};
use crate::services::grading::AttemptSummary;

pub(crate) const DEFAULT_PASS_MARK: f64 = 50.0;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuizQuestionCreate {
    #[serde(alias = "questionText")]
    #[validate(length(min = 1, message = "question_text must not be empty"))]
    pub(crate) question_text: String,
    #[validate(length(min = 2, message = "at least two options are required"))]
    pub(crate) options: Vec<String>,
    #[serde(alias = "correctAnswer")]
    #[validate(length(min = 1, message = "correct_answer must not be empty"))]
    pub(crate) correct_answer: String,
    #[serde(default = "default_points")]
    #[validate(range(min = 1, message = "points must be positive"))]
    pub(crate) points: i32,
    #[serde(default)]
    pub(crate) explanation: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuizCreate {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[serde(default = "default_pass_mark")]
    #[serde(alias = "passMark")]
    #[validate(range(min = 0.0, max = 100.0, message = "pass_mark must be between 0 and 100"))]
    pub(crate) pass_mark: f64,
    #[serde(default)]
    #[validate(nested)]
    pub(crate) questions: Vec<QuizQuestionCreate>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuizUpdate {
    #[serde(default)]
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: Option<String>,
    #[serde(default)]
    #[serde(alias = "passMark")]
    #[validate(range(min = 0.0, max = 100.0, message = "pass_mark must be between 0 and 100"))]
    pub(crate) pass_mark: Option<f64>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuizQuestionsReplace {
    #[validate(nested)]
    pub(crate) questions: Vec<QuizQuestionCreate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AttemptSubmit {
    #[serde(default)]
    pub(crate) answers: HashMap<String, String>,
    #[serde(default)]
    #[serde(alias = "timeTaken")]
    pub(crate) time_taken: i32,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizQuestionResponse {
    pub(crate) id: String,
    pub(crate) question_text: String,
    pub(crate) options: Vec<String>,
    pub(crate) points: i32,
    pub(crate) position: i32,
    /// Present only for callers allowed to manage the quiz, and inside
    /// attempt detail after submission.
    pub(crate) correct_answer: Option<String>,
    pub(crate) explanation: Option<String>,
}

impl QuizQuestionResponse {
    pub(crate) fn from_db(question: QuizQuestion, include_answers: bool) -> Self {
        Self {
            id: question.id,
            question_text: question.question_text,
            options: question.options.0,
            points: question.points,
            position: question.position,
            correct_answer: include_answers.then_some(question.correct_answer),
            explanation: if include_answers { question.explanation } else { None },
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizResponse {
    pub(crate) id: String,
    pub(crate) unit_id: String,
    pub(crate) title: String,
    pub(crate) pass_mark: f64,
    pub(crate) is_published: bool,
    pub(crate) created_by: String,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
    pub(crate) questions: Vec<QuizQuestionResponse>,
}

impl QuizResponse {
    pub(crate) fn from_db(
        quiz: Quiz,
        questions: Vec<QuizQuestion>,
        include_answers: bool,
    ) -> Self {
        Self {
            id: quiz.id,
            unit_id: quiz.unit_id,
            title: quiz.title,
            pass_mark: quiz.pass_mark,
            is_published: quiz.is_published,
            created_by: quiz.created_by,
            created_at: format_primitive(quiz.created_at),
            updated_at: format_primitive(quiz.updated_at),
            questions: questions
                .into_iter()
                .map(|question| QuizQuestionResponse::from_db(question, include_answers))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizSummaryResponse {
    pub(crate) id: String,
    pub(crate) unit_id: String,
    pub(crate) title: String,
    pub(crate) pass_mark: f64,
    pub(crate) is_published: bool,
    pub(crate) created_by: String,
    pub(crate) created_at: String,
}

impl QuizSummaryResponse {
    pub(crate) fn from_db(quiz: Quiz) -> Self {
        Self {
            id: quiz.id,
            unit_id: quiz.unit_id,
            title: quiz.title,
            pass_mark: quiz.pass_mark,
            is_published: quiz.is_published,
            created_by: quiz.created_by,
            created_at: format_primitive(quiz.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AttemptResponse {
    pub(crate) id: String,
    pub(crate) quiz_id: String,
    pub(crate) user_id: String,
    pub(crate) score: f64,
    pub(crate) passed: bool,
    pub(crate) answers: HashMap<String, String>,
    pub(crate) time_taken: i32,
    pub(crate) created_at: String,
}

impl AttemptResponse {
    pub(crate) fn from_db(attempt: QuizAttempt) -> Self {
        Self {
            id: attempt.id,
            quiz_id: attempt.quiz_id,
            user_id: attempt.user_id,
            score: attempt.score,
            passed: attempt.passed,
            answers: attempt.answers.0,
            time_taken: attempt.time_taken,
            created_at: format_primitive(attempt.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AttemptDetailResponse {
    pub(crate) attempt: AttemptResponse,
    pub(crate) quiz: QuizResponse,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResultsSummaryResponse {
    pub(crate) total_attempts: i64,
    pub(crate) pass_rate: f64,
    pub(crate) avg_score: f64,
    pub(crate) highest_score: f64,
    pub(crate) lowest_score: f64,
}

impl ResultsSummaryResponse {
    pub(crate) fn from_summary(summary: AttemptSummary) -> Self {
        Self {
            total_attempts: summary.total_attempts,
            pass_rate: summary.pass_rate,
            avg_score: summary.avg_score,
            highest_score: summary.highest_score,
            lowest_score: summary.lowest_score,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizResultsResponse {
    pub(crate) attempts: Vec<AttemptResponse>,
    pub(crate) summary: ResultsSummaryResponse,
}

fn default_points() -> i32 {
    1
}

fn default_pass_mark() -> f64 {
    DEFAULT_PASS_MARK
}
