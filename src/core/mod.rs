//! Core types: players, actions, events, state, die sources, configuration.
//!
//! These are the building blocks the rules engine operates on. Nothing in
//! here advances the game by itself.

pub mod player;
pub mod dice;
pub mod config;
pub mod error;
pub mod action;
pub mod event;
pub mod state;

pub use player::{Player, PlayerId, PlayerMap};
pub use dice::{DieSource, RandomDie, ScriptedDie};
pub use config::GameConfig;
pub use error::{GameError, GameResult};
pub use action::Action;
pub use event::{AffectedPlayers, Event, RoundEndReason};
pub use state::{GameState, MatchSummary, RoundState, RoundStatus};
