//! Study session API tests.

mod common;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::fixtures;
use common::{FailingRepository, TestContext};

async fn create_session(ctx: &TestContext, config: Value) -> Value {
    let response = ctx.server.post("/api/sessions").json(&config).await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

fn session_path(session: &Value, action: &str) -> String {
    let id = session["id"].as_str().unwrap();
    if action.is_empty() {
        format!("/api/sessions/{}", id)
    } else {
        format!("/api/sessions/{}/{}", id, action)
    }
}

/// Civil cards only, three of them, in repository order.
#[tokio::test]
async fn test_create_sequential_session_for_area() {
    let ctx = TestContext::new(fixtures::legal_cards());
    let body = create_session(&ctx, fixtures::session_config(&["Civil"], 3, "sequential")).await;

    assert_eq!(body["total"], 3);
    assert_eq!(body["status"], json!({ "state": "running", "index": 0 }));
    assert_eq!(body["current"]["id"], 1);
    assert_eq!(body["current"]["area"], "Civil");
    assert_eq!(body["current"]["phase"], "unrevealed");
    assert!(body["current"].get("answer").is_none());
    assert!(body["current"].get("explanation").is_none());
    assert_eq!(ctx.sessions.len().await, 1);
}

#[tokio::test]
async fn test_no_matching_cards_is_empty_result() {
    let ctx = TestContext::new(fixtures::legal_cards());

    let response = ctx
        .server
        .post("/api/sessions")
        .json(&fixtures::session_config(&["Trabalho"], 5, "random"))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["error"], "empty_result");
    assert_eq!(ctx.sessions.len().await, 0);
}

#[tokio::test]
async fn test_empty_repository_is_empty_result() {
    let ctx = TestContext::new(vec![]);

    let response = ctx.server.post("/api/sessions").json(&json!({})).await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_zero_card_count_is_invalid_config() {
    let ctx = TestContext::new(fixtures::legal_cards());

    let response = ctx
        .server
        .post("/api/sessions")
        .json(&fixtures::session_config(&[], 0, "random"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "invalid_config");
}

#[tokio::test]
async fn test_negative_card_count_is_invalid_config() {
    let ctx = TestContext::new(fixtures::legal_cards());

    for path in ["/api/sessions", "/api/sessions/preview"] {
        let response = ctx
            .server
            .post(path)
            .json(&json!({ "card_count": -1 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "invalid_config");
        assert!(body["message"].as_str().unwrap().contains("card_count"));
    }
    assert_eq!(ctx.sessions.len().await, 0);
}

#[tokio::test]
async fn test_card_count_is_capped_by_matches() {
    let ctx = TestContext::new(fixtures::legal_cards());
    let body = create_session(&ctx, fixtures::session_config(&["Civil"], 100, "random")).await;
    assert_eq!(body["total"], 5);
}

#[tokio::test]
async fn test_repository_failure_is_upstream_error() {
    let ctx = TestContext::with_repository(Arc::new(FailingRepository));

    let response = ctx
        .server
        .post("/api/sessions")
        .json(&fixtures::session_config(&[], 5, "random"))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["error"], "upstream_error");
}

#[tokio::test]
async fn test_manual_mode_requires_reveal_before_grade() {
    let ctx = TestContext::new(fixtures::legal_cards());
    let session = create_session(&ctx, fixtures::session_config(&[], 2, "sequential")).await;

    let response = ctx
        .server
        .post(&session_path(&session, "grade"))
        .json(&fixtures::grade_request("correct", None))
        .await;
    response.assert_status(StatusCode::CONFLICT);

    let response = ctx.server.post(&session_path(&session, "reveal")).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["current"]["phase"], "revealed");
    assert_eq!(body["current"]["answer"], "Answer 1.");
    assert_eq!(body["current"]["explanation"], "Explanation 1.");

    let response = ctx
        .server
        .post(&session_path(&session, "grade"))
        .json(&fixtures::grade_request("correct", None))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["current"]["phase"], "graded");
    assert_eq!(body["current"]["outcome"], "correct");
}

#[tokio::test]
async fn test_auto_mode_grades_without_reveal() {
    let ctx = TestContext::new(fixtures::legal_cards());
    let session = create_session(
        &ctx,
        json!({ "card_count": 2, "ordering": "sequential", "reveal_mode": "auto", "narrate": true }),
    )
    .await;
    assert_eq!(session["reveal_mode"], "auto");
    assert_eq!(session["narrate"], true);

    let response = ctx
        .server
        .post(&session_path(&session, "grade"))
        .json(&fixtures::grade_request("incorrect", None))
        .await;
    response.assert_status_ok();
}

/// Grade a card incorrect, re-grade it correct later in the session.
#[tokio::test]
async fn test_regrade_last_outcome_wins() {
    let ctx = TestContext::new(fixtures::legal_cards());
    let session = create_session(&ctx, fixtures::session_config(&["Penal"], 3, "sequential")).await;

    ctx.server.post(&session_path(&session, "reveal")).await;
    ctx.server
        .post(&session_path(&session, "grade"))
        .json(&fixtures::grade_request("incorrect", None))
        .await
        .assert_status_ok();
    ctx.server
        .post(&session_path(&session, "advance"))
        .await
        .assert_status_ok();

    ctx.server
        .post(&session_path(&session, "grade"))
        .json(&fixtures::grade_request("correct", Some(2)))
        .await
        .assert_status_ok();

    let response = ctx.server.get(&session_path(&session, "summary")).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["summary"]["correct"], 1);
    assert_eq!(body["summary"]["incorrect"], 0);
    assert_eq!(body["summary"]["ungraded"], 2);
    assert_eq!(body["outcomes"][0]["card_id"], 2);
    assert_eq!(body["outcomes"][0]["outcome"], "correct");
}

#[tokio::test]
async fn test_regrade_unreached_card_is_conflict() {
    let ctx = TestContext::new(fixtures::legal_cards());
    let session = create_session(&ctx, fixtures::session_config(&["Civil"], 3, "sequential")).await;

    let response = ctx
        .server
        .post(&session_path(&session, "grade"))
        .json(&fixtures::grade_request("skipped", Some(5)))
        .await;
    response.assert_status(StatusCode::CONFLICT);

    let response = ctx
        .server
        .post(&session_path(&session, "grade"))
        .json(&fixtures::grade_request("skipped", Some(2)))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_advance_to_completion() {
    let ctx = TestContext::new(fixtures::legal_cards());
    let session = create_session(&ctx, fixtures::session_config(&[], 2, "sequential")).await;

    let response = ctx.server.post(&session_path(&session, "advance")).await;
    let body: Value = response.json();
    assert_eq!(body["status"], json!({ "state": "running", "index": 1 }));
    assert_eq!(body["current"]["id"], 2);

    let response = ctx.server.post(&session_path(&session, "advance")).await;
    let body: Value = response.json();
    assert_eq!(body["status"], json!({ "state": "complete" }));
    assert!(body.get("current").is_none());
    assert!(body.get("completed_at").is_some());

    let response = ctx.server.post(&session_path(&session, "advance")).await;
    response.assert_status(StatusCode::CONFLICT);
    let response = ctx.server.post(&session_path(&session, "reveal")).await;
    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_random_sessions_vary_in_order() {
    let ctx = TestContext::new(fixtures::legal_cards());

    let mut first_cards = HashSet::new();
    for _ in 0..50 {
        let body = create_session(&ctx, fixtures::session_config(&["Civil"], 5, "random")).await;
        first_cards.insert(body["current"]["id"].as_i64().unwrap());
    }

    assert!(first_cards.len() > 1);
    assert!(first_cards.iter().all(|id| id % 2 == 1));
}

#[tokio::test]
async fn test_sessions_do_not_share_state() {
    let ctx = TestContext::new(fixtures::legal_cards());
    let config = fixtures::session_config(&[], 3, "sequential");
    let first = create_session(&ctx, config.clone()).await;
    let second = create_session(&ctx, config).await;

    ctx.server.post(&session_path(&first, "reveal")).await;
    ctx.server.post(&session_path(&first, "advance")).await;

    let response = ctx.server.get(&session_path(&second, "")).await;
    let body: Value = response.json();
    assert_eq!(body["status"]["index"], 0);
    assert_eq!(body["current"]["phase"], "unrevealed");
}

#[tokio::test]
async fn test_discard_session() {
    let ctx = TestContext::new(fixtures::legal_cards());
    let session = create_session(&ctx, fixtures::session_config(&[], 3, "random")).await;

    let response = ctx.server.delete(&session_path(&session, "")).await;
    response.assert_status(StatusCode::NO_CONTENT);
    assert_eq!(ctx.sessions.len().await, 0);

    let response = ctx.server.get(&session_path(&session, "")).await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_session_not_found() {
    let ctx = TestContext::new(fixtures::legal_cards());

    let response = ctx
        .server
        .get("/api/sessions/00000000-0000-0000-0000-000000000000")
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_preview_counts_matching_cards() {
    let ctx = TestContext::new(fixtures::legal_cards());

    let response = ctx
        .server
        .post("/api/sessions/preview")
        .json(&fixtures::session_config(&["Penal"], 3, "random"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["matching_cards"], 5);
    assert_eq!(body["queue_length"], 3);
    assert_eq!(ctx.sessions.len().await, 0);
}

/// Completed sessions nobody discards are evicted once idle past the TTL.
#[tokio::test]
async fn test_idle_sessions_are_evicted_on_create() {
    let ctx = TestContext::with_session_ttl(fixtures::legal_cards(), Duration::ZERO);

    for _ in 0..5 {
        let session = create_session(&ctx, fixtures::session_config(&[], 1, "sequential")).await;
        ctx.server
            .post(&session_path(&session, "advance"))
            .await
            .assert_status_ok();
    }

    assert_eq!(ctx.sessions.len().await, 1);
}
