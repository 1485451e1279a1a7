#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{FixedOffset, TimeZone, Utc};
use http_body_util::BodyExt;
use lucky_api::bootstrap::{start_engine_with, Engine};
use lucky_api::config::{GameConfig, ServerConfig};
use lucky_api::router::build_app_router;
use lucky_api::state::AppState;
use lucky_core::clock::ManualClock;
use lucky_ledger::MemoryLedger;
use lucky_store::MemoryStore;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Game config pinned to Taipei time so window math does not depend on the
/// host zone.
pub fn test_game_config() -> GameConfig {
    GameConfig {
        window_utc_offset: FixedOffset::east_opt(8 * 3600),
        ..GameConfig::default()
    }
}

/// Everything a test may want to poke at besides the router.
pub struct TestApp {
    pub router: Router,
    pub engine: Engine,
    pub clock: ManualClock,
    pub ledger: Arc<MemoryLedger>,
}

/// Build the full application router over an in-memory store, an accepting
/// in-memory ledger and a manual clock set to 2026-02-10 12:00 Taipei.
///
/// Uses the production middleware stack via `build_app_router`.
pub fn build_test_app() -> TestApp {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 2, 10, 4, 0, 0).unwrap());
    let ledger = Arc::new(MemoryLedger::accepting());

    let engine = start_engine_with(
        &test_game_config(),
        Arc::new(MemoryStore::new()),
        ledger.clone(),
        Arc::new(clock.clone()),
    )
    .unwrap();

    let config = test_config();
    let state = AppState {
        draw: engine.service.handle(),
        prizes: Arc::clone(&engine.prizes),
        config: Arc::new(config.clone()),
    };

    TestApp {
        router: build_app_router(state, &config),
        engine,
        clock,
        ledger,
    }
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, None).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
