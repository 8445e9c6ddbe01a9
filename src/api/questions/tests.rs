use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::db::types::UserRole;
use crate::test_support;
use crate::test_support::TestContext;

async fn seed_question(ctx: &TestContext, author_token: &str, unit_id: &str) -> String {
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/units/{unit_id}/questions"),
            Some(author_token),
            Some(json!({
                "title": "How do I invert a binary tree?",
                "body": "Recursion keeps blowing the stack."
            })),
        ))
        .await
        .expect("create question");

    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    created["id"].as_str().expect("question id").to_string()
}

async fn vote(
    ctx: &TestContext,
    token: &str,
    path: &str,
    direction: &str,
) -> (StatusCode, serde_json::Value) {
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            path,
            Some(token),
            Some(json!({ "direction": direction })),
        ))
        .await
        .expect("vote");
    let status = response.status();
    let body = test_support::read_json(response).await;
    (status, body)
}

#[tokio::test]
async fn vote_toggles_switches_and_keeps_counters_exact() {
    let ctx = test_support::setup_test_context().await;

    let author = test_support::insert_user(
        ctx.state.db(),
        "qa-author01",
        "Question Author",
        UserRole::Student,
        "author-pass",
    )
    .await;
    let voter1 = test_support::insert_user(
        ctx.state.db(),
        "qa-voter01",
        "Voter One",
        UserRole::Student,
        "voter-pass",
    )
    .await;
    let voter2 = test_support::insert_user(
        ctx.state.db(),
        "qa-voter02",
        "Voter Two",
        UserRole::Student,
        "voter-pass",
    )
    .await;
    let unit = test_support::create_unit_fixture(ctx.state.db(), &author.id).await;
    let author_token = test_support::bearer_token(&author.id, ctx.state.settings());
    let voter1_token = test_support::bearer_token(&voter1.id, ctx.state.settings());
    let voter2_token = test_support::bearer_token(&voter2.id, ctx.state.settings());

    let question_id = seed_question(&ctx, &author_token, &unit.id).await;
    let vote_path = format!("/api/v1/questions/{question_id}/vote");

    // voter1 up: 1 up.
    let (status, body) = vote(&ctx, &voter1_token, &vote_path, "UP").await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["up_votes"], 1);
    assert_eq!(body["down_votes"], 0);
    assert_eq!(body["voted"], "up");

    // voter1 down: the single vote switches in one step.
    let (_, body) = vote(&ctx, &voter1_token, &vote_path, "DOWN").await;
    assert_eq!(body["up_votes"], 0);
    assert_eq!(body["down_votes"], 1);
    assert_eq!(body["voted"], "down");

    // voter2 down: two down votes total.
    let (_, body) = vote(&ctx, &voter2_token, &vote_path, "down").await;
    assert_eq!(body["up_votes"], 0);
    assert_eq!(body["down_votes"], 2);

    // Counters always equal the ledger rows.
    let rows: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM question_votes WHERE question_id = $1")
            .bind(&question_id)
            .fetch_one(ctx.state.db())
            .await
            .expect("count votes");
    assert_eq!(rows, 2);
}

#[tokio::test]
async fn repeated_vote_toggles_off_leaving_no_row() {
    let ctx = test_support::setup_test_context().await;

    let author = test_support::insert_user(
        ctx.state.db(),
        "qa-author02",
        "Question Author",
        UserRole::Student,
        "author-pass",
    )
    .await;
    let voter = test_support::insert_user(
        ctx.state.db(),
        "qa-voter03",
        "Voter",
        UserRole::Student,
        "voter-pass",
    )
    .await;
    let unit = test_support::create_unit_fixture(ctx.state.db(), &author.id).await;
    let author_token = test_support::bearer_token(&author.id, ctx.state.settings());
    let voter_token = test_support::bearer_token(&voter.id, ctx.state.settings());

    let question_id = seed_question(&ctx, &author_token, &unit.id).await;
    let vote_path = format!("/api/v1/questions/{question_id}/vote");

    let (_, body) = vote(&ctx, &voter_token, &vote_path, "UP").await;
    assert_eq!(body["up_votes"], 1);

    let (_, body) = vote(&ctx, &voter_token, &vote_path, "UP").await;
    assert_eq!(body["up_votes"], 0);
    assert_eq!(body["down_votes"], 0);
    assert!(body["voted"].is_null());

    let rows: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM question_votes WHERE question_id = $1")
            .bind(&question_id)
            .fetch_one(ctx.state.db())
            .await
            .expect("count votes");
    assert_eq!(rows, 0);
}

#[tokio::test]
async fn vote_rejects_bad_direction_and_unknown_subject() {
    let ctx = test_support::setup_test_context().await;

    let author = test_support::insert_user(
        ctx.state.db(),
        "qa-author03",
        "Question Author",
        UserRole::Student,
        "author-pass",
    )
    .await;
    let unit = test_support::create_unit_fixture(ctx.state.db(), &author.id).await;
    let author_token = test_support::bearer_token(&author.id, ctx.state.settings());

    let question_id = seed_question(&ctx, &author_token, &unit.id).await;

    let (status, _) = vote(
        &ctx,
        &author_token,
        &format!("/api/v1/questions/{question_id}/vote"),
        "sideways",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = vote(&ctx, &author_token, "/api/v1/questions/missing/vote", "UP").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            &format!("/api/v1/questions/{question_id}/vote"),
            None,
            Some(json!({ "direction": "UP" })),
        ))
        .await
        .expect("anonymous vote");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn accepting_answers_keeps_exactly_one_accepted() {
    let ctx = test_support::setup_test_context().await;

    let author = test_support::insert_user(
        ctx.state.db(),
        "qa-author04",
        "Question Author",
        UserRole::Student,
        "author-pass",
    )
    .await;
    let helper = test_support::insert_user(
        ctx.state.db(),
        "qa-helper01",
        "Helpful Student",
        UserRole::Student,
        "helper-pass",
    )
    .await;
    let bystander = test_support::insert_user(
        ctx.state.db(),
        "qa-bystander",
        "Bystander",
        UserRole::Student,
        "bystander-pass",
    )
    .await;
    let unit = test_support::create_unit_fixture(ctx.state.db(), &author.id).await;
    let author_token = test_support::bearer_token(&author.id, ctx.state.settings());
    let helper_token = test_support::bearer_token(&helper.id, ctx.state.settings());
    let bystander_token = test_support::bearer_token(&bystander.id, ctx.state.settings());

    let question_id = seed_question(&ctx, &author_token, &unit.id).await;

    let mut answer_ids = Vec::new();
    for body in ["Use iteration.", "Use an explicit stack."] {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                &format!("/api/v1/questions/{question_id}/answers"),
                Some(&helper_token),
                Some(json!({ "body": body })),
            ))
            .await
            .expect("post answer");
        let created = test_support::read_json(response).await;
        answer_ids.push(created["id"].as_str().expect("answer id").to_string());
    }

    // A random student cannot accept.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            &format!("/api/v1/answers/{}/accept", answer_ids[0]),
            Some(&bystander_token),
            None,
        ))
        .await
        .expect("accept as bystander");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The question author accepts the first answer.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            &format!("/api/v1/answers/{}/accept", answer_ids[0]),
            Some(&author_token),
            None,
        ))
        .await
        .expect("accept first answer");
    let status = response.status();
    let accepted = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {accepted}");
    assert_eq!(accepted["is_accepted"], true);

    // Then changes their mind: acceptance moves to the second answer.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            &format!("/api/v1/answers/{}/accept", answer_ids[1]),
            Some(&author_token),
            None,
        ))
        .await
        .expect("accept second answer");
    let accepted = test_support::read_json(response).await;
    assert_eq!(accepted["is_accepted"], true);

    let accepted_rows: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM answers WHERE question_id = $1 AND is_accepted",
    )
    .bind(&question_id)
    .fetch_one(ctx.state.db())
    .await
    .expect("count accepted");
    assert_eq!(accepted_rows, 1);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/questions/{question_id}"),
            Some(&author_token),
            None,
        ))
        .await
        .expect("get question");
    let detail = test_support::read_json(response).await;
    assert_eq!(detail["question"]["is_resolved"], true);
    // The accepted answer sorts first.
    assert_eq!(detail["answers"][0]["id"], answer_ids[1].as_str());

    // The helper was notified about the answer and the acceptance.
    let helper_notifications = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/notifications",
            Some(&helper_token),
            None,
        ))
        .await
        .expect("helper notifications");
    let listed = test_support::read_json(helper_notifications).await;
    let kinds: Vec<&str> = listed["items"]
        .as_array()
        .expect("items")
        .iter()
        .filter_map(|item| item["kind"].as_str())
        .collect();
    assert!(kinds.contains(&"answer_accepted"), "kinds: {kinds:?}");

    // Accepting an unknown answer is a 404.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            "/api/v1/answers/missing/accept",
            Some(&author_token),
            None,
        ))
        .await
        .expect("accept missing answer");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn answer_votes_use_their_own_ledger() {
    let ctx = test_support::setup_test_context().await;

    let author = test_support::insert_user(
        ctx.state.db(),
        "qa-author05",
        "Question Author",
        UserRole::Student,
        "author-pass",
    )
    .await;
    let helper = test_support::insert_user(
        ctx.state.db(),
        "qa-helper02",
        "Helpful Student",
        UserRole::Student,
        "helper-pass",
    )
    .await;
    let unit = test_support::create_unit_fixture(ctx.state.db(), &author.id).await;
    let author_token = test_support::bearer_token(&author.id, ctx.state.settings());
    let helper_token = test_support::bearer_token(&helper.id, ctx.state.settings());

    let question_id = seed_question(&ctx, &author_token, &unit.id).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/questions/{question_id}/answers"),
            Some(&helper_token),
            Some(json!({ "body": "Try tail recursion." })),
        ))
        .await
        .expect("post answer");
    let answer = test_support::read_json(response).await;
    let answer_id = answer["id"].as_str().expect("answer id").to_string();

    let (status, body) =
        vote(&ctx, &author_token, &format!("/api/v1/answers/{answer_id}/vote"), "UP").await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["up_votes"], 1);
    assert_eq!(body["voted"], "up");

    // The question's counters are untouched by answer votes.
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/questions/{question_id}"),
            Some(&author_token),
            None,
        ))
        .await
        .expect("get question");
    let detail = test_support::read_json(response).await;
    assert_eq!(detail["question"]["up_votes"], 0);
    assert_eq!(detail["answers"][0]["up_votes"], 1);
}
