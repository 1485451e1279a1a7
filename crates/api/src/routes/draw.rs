//! Route definitions for the play cycle.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::draw;
use crate::state::AppState;

/// Play cycle routes mounted at `/draw`.
///
/// ```text
/// GET    /         -> status
/// POST   /         -> start_draw
/// POST   /reveal   -> confirm_reveal
/// DELETE /current  -> dismiss_current_win
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(draw::status).post(draw::start_draw))
        .route("/reveal", post(draw::confirm_reveal))
        .route("/current", delete(draw::dismiss_current_win))
}
