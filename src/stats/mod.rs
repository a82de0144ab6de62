//! Player statistics.
//!
//! The engine accrues counters on every roll, bank and bust. At each match
//! boundary it compares the live counters with a `StatsSnapshot` taken at the
//! previous boundary to produce a `StatsDelta` for the match summary.

pub mod player;

pub use player::{PlayerStatistics, StatsDelta, StatsSnapshot};
