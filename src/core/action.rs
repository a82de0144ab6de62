//! Player inputs.
//!
//! There are only two things anyone can do: ask the current roller to roll,
//! or bank on behalf of an active player. Banking is allowed out of turn.
//! Actions are never stored; the events they produce are.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// A single external input to the rules engine.
///
/// ## Example
///
/// ```
/// use bank_dice::core::{Action, PlayerId};
///
/// let roll = Action::Roll;
/// let bank = Action::Bank(PlayerId::new(2));
///
/// assert_eq!(bank.player(), Some(PlayerId::new(2)));
/// assert_eq!(roll.player(), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "player_id", rename_all = "snake_case")]
pub enum Action {
    /// The current roller rolls the die.
    Roll,
    /// The named player banks the current round score.
    Bank(PlayerId),
}

impl Action {
    /// The player named by this action, if any.
    #[must_use]
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            Action::Roll => None,
            Action::Bank(p) => Some(*p),
        }
    }

    #[must_use]
    pub fn is_roll(&self) -> bool {
        matches!(self, Action::Roll)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Roll => write!(f, "roll"),
            Action::Bank(p) => write!(f, "bank({})", p.0),
        }
    }
}
