//! Route definitions for past wins.

use axum::routing::get;
use axum::Router;

use crate::handlers::history;
use crate::state::AppState;

/// History routes mounted at `/history`.
///
/// ```text
/// GET /      -> list_history
/// GET /{id}  -> get_history_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(history::list_history))
        .route("/{id}", get(history::get_history_item))
}
