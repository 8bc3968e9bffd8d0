//! Simulation errors

use std::fmt;

use super::fish::FishId;
use super::state::GamePhase;

/// Failure of a single input callback. The session carries on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// No live fish with this id
    UnknownFish(FishId),
    /// Fish carries a size class no tier is configured with
    UnknownSizeClass(String),
    /// Input arrived outside the running phase
    NotRunning(GamePhase),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::UnknownFish(id) => write!(f, "no live fish with id {}", id),
            GameError::UnknownSizeClass(class) => write!(f, "size class not found: {}", class),
            GameError::NotRunning(phase) => write!(f, "game is not running ({:?})", phase),
        }
    }
}

impl std::error::Error for GameError {}
