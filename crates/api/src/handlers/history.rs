use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use lucky_core::error::CoreError;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/history
///
/// All wins, most recent first.
pub async fn list_history(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let history = state.draw.history().await?;
    Ok(Json(DataResponse { data: history }))
}

/// GET /api/v1/history/{id}
///
/// One win by voucher code.
pub async fn get_history_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let record = state
        .draw
        .view_history_item(id.clone())
        .await?
        .ok_or(CoreError::NotFound {
            entity: "WinRecord",
            id,
        })?;

    Ok(Json(DataResponse { data: record }))
}
