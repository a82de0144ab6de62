//! Rules engine.
//!
//! `RulesEngine` is the single place game state changes:
//! - Which actions are legal
//! - How a roll or bank changes the round, totals and statistics
//! - When rounds, matches and the game end
//!
//! Callers submit actions and read back events and state.

pub mod engine;

pub use engine::{GreedRanking, RulesEngine};
