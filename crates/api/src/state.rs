use std::sync::Arc;

use lucky_core::prize::PrizeTable;
use lucky_engine::DrawHandle;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the draw handle is a channel sender and the rest sits
/// behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Front door to the draw service task.
    pub draw: DrawHandle,
    /// The active prize table, read-only.
    pub prizes: Arc<PrizeTable>,
    pub config: Arc<ServerConfig>,
}
