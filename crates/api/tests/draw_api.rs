//! Integration tests for the draw, history, reset and prize endpoints.
//!
//! Time is paused so the reveal settle delay can be stepped over; window
//! math runs on the manual clock from `common`.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use common::{body_json, delete, get, post, post_json};
use lucky_core::clock::Clock;
use serde_json::json;

/// Start and reveal a draw, then let the cycle settle. Returns the voucher.
async fn play(app: &common::TestApp) -> String {
    let started = body_json(post(&app.router, "/api/v1/draw").await).await;
    assert_eq!(started["data"]["status"], "started");

    let revealed = body_json(post(&app.router, "/api/v1/draw/reveal").await).await;
    assert_eq!(revealed["data"]["status"], "revealed");

    tokio::time::sleep(Duration::from_millis(600)).await;
    revealed["data"]["record"]["id"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Test: a fresh player has one attempt in the current window
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn status_starts_eligible() {
    let app = common::build_test_app();

    let response = get(&app.router, "/api/v1/draw").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["phase"], "idle");
    assert_eq!(data["has_played"], false);
    assert_eq!(data["attempts_remaining"], 1);
    assert_eq!(data["history_len"], 0);
    assert!(data["current_win"].is_null());
}

// ---------------------------------------------------------------------------
// Test: draw -> reveal -> settle over HTTP
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn full_play_cycle() {
    let app = common::build_test_app();

    let started = body_json(post(&app.router, "/api/v1/draw").await).await;
    assert_eq!(started["data"]["status"], "started");
    let prize_id = started["data"]["pending"]["prize"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(app.engine.prizes.get(&prize_id).is_some());

    let revealed = body_json(post(&app.router, "/api/v1/draw/reveal").await).await;
    let record = &revealed["data"]["record"];
    assert_eq!(record["prizeId"], prize_id.as_str());
    assert!(record["id"].as_str().unwrap().starts_with("ET-"));
    assert_eq!(record["timestamp"], app.clock.now().timestamp_millis());

    // Still revealing: a new draw is refused as in progress.
    let busy = body_json(post(&app.router, "/api/v1/draw").await).await;
    assert_eq!(busy["data"]["status"], "in_progress");
    assert_eq!(busy["data"]["phase"], "revealing");

    tokio::time::sleep(Duration::from_millis(600)).await;

    let status = body_json(get(&app.router, "/api/v1/draw").await).await;
    assert_eq!(status["data"]["phase"], "idle");
    assert_eq!(status["data"]["attempts_remaining"], 0);
    assert_eq!(status["data"]["current_win"]["id"], record["id"]);

    let again = body_json(post(&app.router, "/api/v1/draw").await).await;
    assert_eq!(again["data"]["status"], "already_played");
    assert_eq!(
        again["data"]["next_window_start"],
        "2026-02-11T02:00:00Z"
    );
}

// ---------------------------------------------------------------------------
// Test: reveal with nothing pending is a no-op
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn reveal_without_draw_is_noop() {
    let app = common::build_test_app();

    let response = post(&app.router, "/api/v1/draw/reveal").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "nothing_pending");

    let history = body_json(get(&app.router, "/api/v1/history").await).await;
    assert_eq!(history["data"].as_array().unwrap().len(), 0);
}

// ---------------------------------------------------------------------------
// Test: history lists wins and the ledger acknowledgement lands
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn history_reflects_synced_win() {
    let app = common::build_test_app();
    let voucher = play(&app).await;

    let history = body_json(get(&app.router, "/api/v1/history").await).await;
    let records = history["data"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], voucher.as_str());
    assert_eq!(records[0]["synced"], true);
    assert_eq!(app.ledger.received().len(), 1);

    let item = get(&app.router, &format!("/api/v1/history/{voucher}")).await;
    assert_eq!(item.status(), StatusCode::OK);
    assert_eq!(body_json(item).await["data"]["id"], voucher.as_str());
}

#[tokio::test(start_paused = true)]
async fn unknown_history_item_returns_404() {
    let app = common::build_test_app();

    let response = get(&app.router, "/api/v1/history/ET-8-NOPE0").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "WinRecord with id ET-8-NOPE0 not found");
}

// ---------------------------------------------------------------------------
// Test: a new window opens at the boundary
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn next_window_allows_another_play() {
    let app = common::build_test_app();
    play(&app).await;

    // 2026-02-11 10:00 Taipei.
    app.clock
        .set(Utc.with_ymd_and_hms(2026, 2, 11, 2, 0, 0).unwrap());

    let started = body_json(post(&app.router, "/api/v1/draw").await).await;
    assert_eq!(started["data"]["status"], "started");
}

// ---------------------------------------------------------------------------
// Test: dismissing the current win keeps the history
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn dismiss_current_win() {
    let app = common::build_test_app();
    let voucher = play(&app).await;

    let dismissed = body_json(delete(&app.router, "/api/v1/draw/current").await).await;
    assert_eq!(dismissed["data"]["id"], voucher.as_str());

    let status = body_json(get(&app.router, "/api/v1/draw").await).await;
    assert!(status["data"]["current_win"].is_null());
    assert_eq!(status["data"]["history_len"], 1);

    let again = body_json(delete(&app.router, "/api/v1/draw/current").await).await;
    assert!(again["data"].is_null());
}

// ---------------------------------------------------------------------------
// Test: two-step reset
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn reset_with_ticket_restores_eligibility() {
    let app = common::build_test_app();
    play(&app).await;

    let ticket = body_json(post(&app.router, "/api/v1/reset/request").await).await;
    let token = ticket["data"]["token"].as_str().unwrap().to_string();
    assert!(ticket["data"]["expires_at"].is_string());

    let response = post_json(&app.router, "/api/v1/reset/confirm", json!({ "token": token })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "reset");
    assert_eq!(json["data"]["cleared"], 1);

    let status = body_json(get(&app.router, "/api/v1/draw").await).await;
    assert_eq!(status["data"]["attempts_remaining"], 1);
    assert_eq!(status["data"]["history_len"], 0);
    assert!(status["data"]["last_played_at"].is_null());

    // The ticket is single-use.
    let reused = post_json(&app.router, "/api/v1/reset/confirm", json!({ "token": token })).await;
    assert_eq!(reused.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(reused).await["code"], "CONFLICT");
}

#[tokio::test(start_paused = true)]
async fn reset_rejects_malformed_and_expired_tickets() {
    let app = common::build_test_app();
    play(&app).await;

    let malformed = post_json(&app.router, "/api/v1/reset/confirm", json!({ "token": "nope" })).await;
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(malformed).await["code"], "BAD_REQUEST");

    let ticket = body_json(post(&app.router, "/api/v1/reset/request").await).await;
    let token = ticket["data"]["token"].as_str().unwrap().to_string();
    app.clock.advance(chrono::TimeDelta::seconds(121));

    let expired = post_json(&app.router, "/api/v1/reset/confirm", json!({ "token": token })).await;
    assert_eq!(expired.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(expired).await["error"], "reset ticket has expired");

    let history = body_json(get(&app.router, "/api/v1/history").await).await;
    assert_eq!(history["data"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: prize table
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn prizes_list_the_active_table_in_order() {
    let app = common::build_test_app();

    let json = body_json(get(&app.router, "/api/v1/prizes").await).await;
    let prizes = json["data"].as_array().unwrap();

    assert_eq!(prizes.len(), 6);
    assert_eq!(prizes[0]["id"], "lucky-8");
    assert_eq!(prizes[5]["id"], "lucky-888");
    assert_eq!(prizes[0]["probability"], 0.45);
}

// ---------------------------------------------------------------------------
// Test: stopped engine maps to 503
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn stopped_engine_returns_503() {
    let app = common::build_test_app();
    app.engine.service.shutdown().await;

    let response = post(&app.router, "/api/v1/draw").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["code"], "SERVICE_UNAVAILABLE");
}
