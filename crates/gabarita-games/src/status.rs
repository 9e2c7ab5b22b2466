//! The lifecycle shared by every game.

use serde::{Deserialize, Serialize};

use crate::GameError;

/// Where a game is in its lifecycle.
///
/// ```text
/// Setup → Playing → Won | Lost | Finished
///                              Finished → Reviewing   (mock exam)
/// ```
///
/// `reset` moves any state back to `Playing` with fresh data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Setup,
    Playing,
    Won,
    Lost,
    Finished,
    Reviewing,
}

impl GameStatus {
    /// Returns `true` once the game has ended, whatever the outcome.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Won | Self::Lost | Self::Finished | Self::Reviewing)
    }

    /// Returns `true` if player moves are accepted.
    pub fn accepts_input(&self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Maps a non-playing status to the error an action should get.
    pub fn ensure_playing(self) -> Result<(), GameError> {
        match self {
            Self::Playing => Ok(()),
            Self::Setup => Err(GameError::NotStarted),
            _ => Err(GameError::GameOver),
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Setup => write!(f, "Setup"),
            Self::Playing => write!(f, "Playing"),
            Self::Won => write!(f, "Won"),
            Self::Lost => write!(f, "Lost"),
            Self::Finished => write!(f, "Finished"),
            Self::Reviewing => write!(f, "Reviewing"),
        }
    }
}
