use std::collections::HashMap;

use crate::db::models::{QuizAttempt, QuizQuestion};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct GradedAttempt {
    pub(crate) earned_points: i32,
    pub(crate) total_points: i32,
    pub(crate) score: f64,
    pub(crate) passed: bool,
}

/// Grades a submitted answer map against a quiz's question set.
///
/// Total points accumulate for every question regardless of correctness;
/// earned points only when the submitted option string-equals the stored
/// correct answer (exact, case-sensitive, no partial credit). Submitted
/// keys that match no question are ignored, and questions without a
/// submitted answer count as wrong.
pub(crate) fn grade(
    questions: &[QuizQuestion],
    answers: &HashMap<String, String>,
    pass_mark: f64,
) -> GradedAttempt {
    let mut earned_points = 0;
    let mut total_points = 0;

    for question in questions {
        total_points += question.points;
        if answers.get(question.id.as_str()) == Some(&question.correct_answer) {
            earned_points += question.points;
        }
    }

    let score = if total_points == 0 {
        0.0
    } else {
        f64::from(earned_points) / f64::from(total_points) * 100.0
    };

    GradedAttempt { earned_points, total_points, score, passed: score >= pass_mark }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct AttemptSummary {
    pub(crate) total_attempts: i64,
    pub(crate) pass_rate: f64,
    pub(crate) avg_score: f64,
    pub(crate) highest_score: f64,
    pub(crate) lowest_score: f64,
}

/// Aggregate statistics over every attempt of a quiz; all zeros when the
/// quiz has no attempts yet.
pub(crate) fn summarize(attempts: &[QuizAttempt]) -> AttemptSummary {
    if attempts.is_empty() {
        return AttemptSummary {
            total_attempts: 0,
            pass_rate: 0.0,
            avg_score: 0.0,
            highest_score: 0.0,
            lowest_score: 0.0,
        };
    }

    let total = attempts.len() as f64;
    let passed = attempts.iter().filter(|attempt| attempt.passed).count() as f64;
    let sum: f64 = attempts.iter().map(|attempt| attempt.score).sum();
    let highest = attempts.iter().map(|attempt| attempt.score).fold(f64::MIN, f64::max);
    let lowest = attempts.iter().map(|attempt| attempt.score).fold(f64::MAX, f64::min);

    AttemptSummary {
        total_attempts: attempts.len() as i64,
        pass_rate: passed / total * 100.0,
        avg_score: sum / total,
        highest_score: highest,
        lowest_score: lowest,
    }
}
