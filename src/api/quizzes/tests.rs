use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::db::types::UserRole;
use crate::test_support;

fn quiz_payload() -> serde_json::Value {
    json!({
        "title": "Foundations check",
        "pass_mark": 50.0,
        "questions": [
            {
                "question_text": "Pick A",
                "options": ["A", "B", "C"],
                "correct_answer": "A",
                "points": 1
            },
            {
                "question_text": "Pick C",
                "options": ["A", "B", "C"],
                "correct_answer": "C",
                "points": 3,
                "explanation": "C is the one"
            }
        ]
    })
}

#[tokio::test]
async fn attempt_is_graded_and_results_aggregate() {
    let ctx = test_support::setup_test_context().await;

    let lecturer = test_support::insert_user(
        ctx.state.db(),
        "lecturer01",
        "Lecturer User",
        UserRole::Lecturer,
        "lecturer-pass",
    )
    .await;
    let student = test_support::insert_user(
        ctx.state.db(),
        "student01",
        "Student User",
        UserRole::Student,
        "student-pass",
    )
    .await;
    let unit = test_support::create_unit_fixture(ctx.state.db(), &lecturer.id).await;
    let lecturer_token = test_support::bearer_token(&lecturer.id, ctx.state.settings());
    let student_token = test_support::bearer_token(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/units/{}/quizzes", unit.id),
            Some(&lecturer_token),
            Some(quiz_payload()),
        ))
        .await
        .expect("create quiz");

    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    let quiz_id = created["id"].as_str().expect("quiz id").to_string();
    let questions = created["questions"].as_array().expect("questions");
    assert_eq!(questions.len(), 2);
    let q1 = questions[0]["id"].as_str().expect("q1 id").to_string();
    let q2 = questions[1]["id"].as_str().expect("q2 id").to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/quizzes/{quiz_id}/publish"),
            Some(&lecturer_token),
            None,
        ))
        .await
        .expect("publish quiz");
    assert_eq!(response.status(), StatusCode::OK);

    // 1 of 4 points: 25%, below the 50% pass mark. The stray key is ignored.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/quizzes/{quiz_id}/attempt"),
            Some(&student_token),
            Some(json!({
                "answers": { q1.clone(): "A", q2.clone(): "B", "not-a-question": "A" },
                "time_taken": 42
            })),
        ))
        .await
        .expect("submit attempt");

    let status = response.status();
    let attempt = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {attempt}");
    assert_eq!(attempt["score"], 25.0);
    assert_eq!(attempt["passed"], false);
    assert_eq!(attempt["time_taken"], 42);
    let attempt_id = attempt["id"].as_str().expect("attempt id").to_string();

    // A second, passing attempt by the same user.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/quizzes/{quiz_id}/attempt"),
            Some(&student_token),
            Some(json!({ "answers": { q1: "A", q2: "C" } })),
        ))
        .await
        .expect("submit second attempt");
    let passing = test_support::read_json(response).await;
    assert_eq!(passing["score"], 100.0);
    assert_eq!(passing["passed"], true);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/quizzes/{quiz_id}/attempt/{attempt_id}"),
            Some(&student_token),
            None,
        ))
        .await
        .expect("attempt detail");

    let status = response.status();
    let detail = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {detail}");
    assert_eq!(detail["attempt"]["id"], attempt_id.as_str());
    // Post-submission review exposes the answer key.
    assert_eq!(detail["quiz"]["questions"][0]["correct_answer"], "A");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/quizzes/{quiz_id}/results"),
            Some(&lecturer_token),
            None,
        ))
        .await
        .expect("quiz results");

    let status = response.status();
    let results = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {results}");
    assert_eq!(results["summary"]["total_attempts"], 2);
    assert_eq!(results["summary"]["pass_rate"], 50.0);
    assert_eq!(results["summary"]["avg_score"], 62.5);
    assert_eq!(results["summary"]["highest_score"], 100.0);
    assert_eq!(results["summary"]["lowest_score"], 25.0);
    // Most recent first.
    assert_eq!(results["attempts"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn results_and_attempts_are_permission_checked() {
    let ctx = test_support::setup_test_context().await;

    let lecturer = test_support::insert_user(
        ctx.state.db(),
        "lecturer02",
        "Lecturer User",
        UserRole::Lecturer,
        "lecturer-pass",
    )
    .await;
    let student = test_support::insert_user(
        ctx.state.db(),
        "student02",
        "Student User",
        UserRole::Student,
        "student-pass",
    )
    .await;
    let other = test_support::insert_user(
        ctx.state.db(),
        "student03",
        "Other Student",
        UserRole::Student,
        "student-pass",
    )
    .await;
    let unit = test_support::create_unit_fixture(ctx.state.db(), &lecturer.id).await;
    let lecturer_token = test_support::bearer_token(&lecturer.id, ctx.state.settings());
    let student_token = test_support::bearer_token(&student.id, ctx.state.settings());
    let other_token = test_support::bearer_token(&other.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/units/{}/quizzes", unit.id),
            Some(&lecturer_token),
            Some(quiz_payload()),
        ))
        .await
        .expect("create quiz");
    let created = test_support::read_json(response).await;
    let quiz_id = created["id"].as_str().expect("quiz id").to_string();

    ctx.app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/quizzes/{quiz_id}/publish"),
            Some(&lecturer_token),
            None,
        ))
        .await
        .expect("publish quiz");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/quizzes/{quiz_id}/attempt"),
            Some(&student_token),
            Some(json!({ "answers": {} })),
        ))
        .await
        .expect("submit attempt");
    let attempt = test_support::read_json(response).await;
    let attempt_id = attempt["id"].as_str().expect("attempt id").to_string();

    // Results are for the creator or an admin only.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/quizzes/{quiz_id}/results"),
            Some(&student_token),
            None,
        ))
        .await
        .expect("results as student");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Another student cannot read someone else's attempt.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/quizzes/{quiz_id}/attempt/{attempt_id}"),
            Some(&other_token),
            None,
        ))
        .await
        .expect("attempt as other");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Unauthenticated submission is rejected.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/quizzes/{quiz_id}/attempt"),
            None,
            Some(json!({ "answers": {} })),
        ))
        .await
        .expect("anonymous attempt");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Unknown quiz id.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/quizzes/missing/attempt",
            Some(&student_token),
            Some(json!({ "answers": {} })),
        ))
        .await
        .expect("attempt on missing quiz");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Empty quiz grades to zero instead of dividing by zero.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/units/{}/quizzes", unit.id),
            Some(&lecturer_token),
            Some(json!({ "title": "Empty quiz", "questions": [] })),
        ))
        .await
        .expect("create empty quiz");
    let empty = test_support::read_json(response).await;
    let empty_id = empty["id"].as_str().expect("quiz id").to_string();

    ctx.app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/quizzes/{empty_id}/publish"),
            Some(&lecturer_token),
            None,
        ))
        .await
        .expect("publish empty quiz");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/quizzes/{empty_id}/attempt"),
            Some(&student_token),
            Some(json!({ "answers": { "anything": "A" } })),
        ))
        .await
        .expect("attempt empty quiz");
    let graded = test_support::read_json(response).await;
    assert_eq!(graded["score"], 0.0);
    assert_eq!(graded["passed"], false);
}

#[tokio::test]
async fn unpublished_quizzes_stay_hidden_from_students() {
    let ctx = test_support::setup_test_context().await;

    let lecturer = test_support::insert_user(
        ctx.state.db(),
        "lecturer03",
        "Lecturer User",
        UserRole::Lecturer,
        "lecturer-pass",
    )
    .await;
    let student = test_support::insert_user(
        ctx.state.db(),
        "student04",
        "Student User",
        UserRole::Student,
        "student-pass",
    )
    .await;
    let unit = test_support::create_unit_fixture(ctx.state.db(), &lecturer.id).await;
    let lecturer_token = test_support::bearer_token(&lecturer.id, ctx.state.settings());
    let student_token = test_support::bearer_token(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/units/{}/quizzes", unit.id),
            Some(&lecturer_token),
            Some(quiz_payload()),
        ))
        .await
        .expect("create quiz");
    let created = test_support::read_json(response).await;
    let quiz_id = created["id"].as_str().expect("quiz id").to_string();
    // The creator sees the answer key on the draft.
    assert_eq!(created["questions"][0]["correct_answer"], "A");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/quizzes/{quiz_id}"),
            Some(&student_token),
            None,
        ))
        .await
        .expect("get draft quiz as student");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/units/{}/quizzes", unit.id),
            Some(&student_token),
            None,
        ))
        .await
        .expect("list quizzes as student");
    let listed = test_support::read_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 0);

    ctx.app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/quizzes/{quiz_id}/publish"),
            Some(&lecturer_token),
            None,
        ))
        .await
        .expect("publish quiz");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/quizzes/{quiz_id}"),
            Some(&student_token),
            None,
        ))
        .await
        .expect("get published quiz as student");

    let status = response.status();
    let fetched = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {fetched}");
    // Students never see the answer key before submitting.
    assert!(fetched["questions"][0]["correct_answer"].is_null());
    assert!(fetched["questions"][1]["explanation"].is_null());
}

#[tokio::test]
async fn question_set_is_replaced_en_masse() {
    let ctx = test_support::setup_test_context().await;

    let lecturer = test_support::insert_user(
        ctx.state.db(),
        "lecturer04",
        "Lecturer User",
        UserRole::Lecturer,
        "lecturer-pass",
    )
    .await;
    let unit = test_support::create_unit_fixture(ctx.state.db(), &lecturer.id).await;
    let lecturer_token = test_support::bearer_token(&lecturer.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/units/{}/quizzes", unit.id),
            Some(&lecturer_token),
            Some(quiz_payload()),
        ))
        .await
        .expect("create quiz");
    let created = test_support::read_json(response).await;
    let quiz_id = created["id"].as_str().expect("quiz id").to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PUT,
            &format!("/api/v1/quizzes/{quiz_id}/questions"),
            Some(&lecturer_token),
            Some(json!({
                "questions": [
                    {
                        "question_text": "Only question",
                        "options": ["yes", "no"],
                        "correct_answer": "yes",
                        "points": 2
                    }
                ]
            })),
        ))
        .await
        .expect("replace questions");

    let status = response.status();
    let replaced = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {replaced}");
    let questions = replaced["questions"].as_array().expect("questions");
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0]["question_text"], "Only question");

    // A correct answer outside the option list is rejected up front.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PUT,
            &format!("/api/v1/quizzes/{quiz_id}/questions"),
            Some(&lecturer_token),
            Some(json!({
                "questions": [
                    {
                        "question_text": "Broken",
                        "options": ["yes", "no"],
                        "correct_answer": "maybe"
                    }
                ]
            })),
        ))
        .await
        .expect("replace with bad answer");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
