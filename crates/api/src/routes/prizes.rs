use axum::routing::get;
use axum::Router;

use crate::handlers::prizes;
use crate::state::AppState;

/// Prize table routes mounted at `/prizes`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(prizes::list_prizes))
}
