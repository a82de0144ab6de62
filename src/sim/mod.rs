//! Batch simulation.
//!
//! Drives the rules engine with one banking policy per player and reports
//! win rates and average scores over many games.

pub mod runner;

pub use runner::{run_single_game, simulate, SimulationConfig, SimulationResult};
