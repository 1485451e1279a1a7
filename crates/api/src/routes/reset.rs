//! Route definitions for the two-step history reset.

use axum::routing::post;
use axum::Router;

use crate::handlers::reset;
use crate::state::AppState;

/// Reset routes mounted at `/reset`.
///
/// ```text
/// POST /request  -> request_reset
/// POST /confirm  -> confirm_reset
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/request", post(reset::request_reset))
        .route("/confirm", post(reset::confirm_reset))
}
