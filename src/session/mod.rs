//! Game sessions.
//!
//! A thin layer for serving many games at once: a store that issues game
//! ids and serializes access per game, and read-model views built from the
//! engine's state.

pub mod store;
pub mod view;

pub use store::{DieFactory, GameId, GameSession, SessionStore};
pub use view::{GameView, PlayerStatsView, PlayerView, SequencedEvent, ValidActionsView};
