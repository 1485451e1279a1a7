/// Errors surfaced by [`DrawHandle`](crate::DrawHandle) calls.
///
/// Gameplay rejections (already played, nothing pending, ...) are ordinary
/// outcomes, not errors. The only failure is talking to a service that is
/// no longer running.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Draw service is not running")]
    Stopped,
}
