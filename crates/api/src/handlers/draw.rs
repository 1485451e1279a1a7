//! Handlers for the play cycle.
//!
//! Rejected actions (already played, nothing pending) are ordinary outcomes
//! and come back as `200` with a `status` tag, never as errors.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/draw
///
/// Current phase, eligibility, window boundaries and the win on display.
pub async fn status(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let snapshot = state.draw.snapshot().await?;
    Ok(Json(DataResponse { data: snapshot }))
}

/// POST /api/v1/draw
///
/// Select a prize for this window's play.
pub async fn start_draw(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let outcome = state.draw.start_draw().await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/draw/reveal
///
/// Reveal the pending prize and record the win.
pub async fn confirm_reveal(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let outcome = state.draw.confirm_reveal().await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// DELETE /api/v1/draw/current
///
/// Hide the win on display. Returns the dismissed record, or `null`.
pub async fn dismiss_current_win(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let dismissed = state.draw.dismiss_current_win().await?;
    Ok(Json(DataResponse { data: dismissed }))
}
