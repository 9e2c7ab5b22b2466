//! Error types for the games layer.

/// Errors returned when an action cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// The game is still in `Setup`; call `reset` first.
    #[error("game has not started")]
    NotStarted,

    /// The game reached a terminal state and takes no more moves.
    #[error("game is over")]
    GameOver,

    /// The action is malformed or not allowed right now.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The runner's command channel is full or closed.
    #[error("game runner is unavailable")]
    Unavailable,
}

impl GameError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }
}
