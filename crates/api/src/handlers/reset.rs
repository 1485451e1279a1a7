//! Handlers for the two-step history reset.
//!
//! `POST /reset/request` hands out a short-lived ticket; the reset only
//! happens when that ticket comes back through `POST /reset/confirm`.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use lucky_core::error::CoreError;
use lucky_engine::ResetOutcome;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /api/v1/reset/confirm`.
#[derive(Debug, Deserialize)]
pub struct ConfirmResetRequest {
    pub token: String,
}

/// POST /api/v1/reset/request
pub async fn request_reset(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let ticket = state.draw.request_reset().await?;
    Ok(Json(DataResponse { data: ticket }))
}

/// POST /api/v1/reset/confirm
///
/// Wipes history and the last-play time. An unknown or expired ticket is a
/// `409`.
pub async fn confirm_reset(
    State(state): State<AppState>,
    Json(input): Json<ConfirmResetRequest>,
) -> AppResult<impl IntoResponse> {
    let token = Uuid::parse_str(input.token.trim())
        .map_err(|_| AppError::BadRequest(format!("'{}' is not a reset ticket", input.token)))?;

    match state.draw.confirm_reset(token).await? {
        outcome @ ResetOutcome::Reset { .. } => Ok(Json(DataResponse { data: outcome })),
        ResetOutcome::InvalidTicket => {
            Err(CoreError::Conflict("reset ticket is unknown or already used".into()).into())
        }
        ResetOutcome::Expired => Err(CoreError::Conflict("reset ticket has expired".into()).into()),
    }
}
