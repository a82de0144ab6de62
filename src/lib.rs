//! # bank-dice
//!
//! Rules engine for a multiplayer push-your-luck dice game.
//!
//! ## The game
//!
//! Every round all players start active with a shared round score of 0.
//! The roller rolls one die:
//!
//! - **1**: bust. Every active player loses the round score and the round ends.
//! - **2**: the round score doubles (or becomes 2 if it was 0).
//! - **3-6**: the face is added to the round score.
//!
//! At any time before a roll, any active player may *bank*: the current
//! round score is added to their total and they sit out the rest of the
//! round. When everyone has banked the round ends. The opener rotates each
//! round; ten rounds make a match and three matches make the game.
//!
//! ## Design Principles
//!
//! 1. **Single writer**: One `RulesEngine` owns one `GameState`. Callers
//!    read state and submit actions; they never mutate state directly.
//!
//! 2. **Events are the history**: Every action appends typed events to the
//!    engine's log. Views are derived from state, never the reverse.
//!
//! 3. **No partial failure**: An action is checked in full before anything
//!    changes.
//!
//! ## Modules
//!
//! - `core`: Player ids, actions, events, state, die sources, configuration
//! - `stats`: Per-player statistics with snapshot and delta
//! - `rules`: The rules engine
//! - `policy`: Banking policies for simulated players
//! - `sim`: Batch simulation
//! - `session`: Multi-game session store and read-model views

pub mod core;
pub mod stats;
pub mod rules;
pub mod policy;
pub mod sim;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    Action, DieSource, Event, GameConfig, GameError, GameResult, GameState, MatchSummary, Player,
    PlayerId, PlayerMap, RandomDie, RoundEndReason, RoundState, RoundStatus, ScriptedDie,
};

pub use crate::stats::{PlayerStatistics, StatsDelta, StatsSnapshot};

pub use crate::rules::{GreedRanking, RulesEngine};

pub use crate::policy::{
    parse_policy, BankingPolicy, NeverBank, PolicySpec, RollLimitBank, ThresholdBank,
};

pub use crate::sim::{run_single_game, simulate, SimulationConfig, SimulationResult};

pub use crate::session::{
    GameId, GameSession, GameView, SequencedEvent, SessionStore, ValidActionsView,
};
