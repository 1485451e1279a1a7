pub mod draw;
pub mod health;
pub mod history;
pub mod prizes;
pub mod reset;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /draw                  status snapshot (GET), start draw (POST)
/// /draw/reveal           confirm reveal (POST)
/// /draw/current          dismiss the current win (DELETE)
///
/// /history               full history, most recent first (GET)
/// /history/{id}          one record (GET)
///
/// /reset/request         issue a reset ticket (POST)
/// /reset/confirm         reset with a ticket (POST)
///
/// /prizes                active prize table (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/draw", draw::router())
        .nest("/history", history::router())
        .nest("/reset", reset::router())
        .nest("/prizes", prizes::router())
}
