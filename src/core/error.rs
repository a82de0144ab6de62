//! Engine error type.
//!
//! Every failure is reported before any state is touched, so a rejected
//! call leaves the game exactly as it was.

use thiserror::Error;

use super::action::Action;

/// Errors produced by the rules engine, die sources and session store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The game could not be set up (too few players, bad config).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The action is not legal in the current state.
    #[error("illegal action {action}: {reason}")]
    IllegalAction { action: Action, reason: &'static str },

    /// A scripted die source was drawn past its end.
    #[error("scripted die source exhausted after {consumed} draws")]
    ExhaustedSource { consumed: usize },

    /// A scripted die source was given a face outside 1..=6.
    #[error("invalid die value {0}, expected 1..=6")]
    InvalidDieValue(u8),

    /// A player ranking was requested on an empty roster.
    #[error("no players")]
    NoPlayers,

    /// The session store has no game with this id.
    #[error("unknown game {0}")]
    UnknownGame(String),
}

impl GameError {
    /// Whether the caller can keep using the game after this error.
    ///
    /// Illegal actions and unknown game ids are ordinary caller mistakes;
    /// the others point at a setup or test defect.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, GameError::IllegalAction { .. } | GameError::UnknownGame(_))
    }
}

/// Shorthand result type for engine operations.
pub type GameResult<T> = Result<T, GameError>;
