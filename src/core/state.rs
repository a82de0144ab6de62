//! Game state.
//!
//! ## RoundState
//!
//! Working state of the round in progress:
//! - Round and match index
//! - Shared round score
//! - Active players (those who have neither banked nor been busted)
//! - Roller, starter and rolls elapsed
//!
//! A fresh `RoundState` is built for every round; nothing carries over.
//!
//! ## GameState
//!
//! The whole-game aggregate: seated players, totals, statistics, the current
//! round, completed match summaries and the game-over flag. Only the rules
//! engine mutates it; everyone else gets a shared reference.

use im::OrdSet;
use serde::{Deserialize, Serialize};

use super::config::GameConfig;
use super::player::{Player, PlayerId, PlayerMap};
use crate::stats::{PlayerStatistics, StatsDelta};

/// Whether a player is still exposed to the round score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundStatus {
    Active,
    Banked,
}

/// State of the round in progress.
///
/// Uses an `im` ordered set for the active players: iteration is ascending
/// by id and cloning is cheap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    /// Round number, starting at 1.
    pub round_index: u32,

    /// Match containing this round, starting at 1.
    pub match_index: u32,

    /// Shared score at stake for every active player.
    pub round_score: u64,

    /// Players still in the round.
    active: OrdSet<PlayerId>,

    /// Recorded roller. May have banked since the last roll; see
    /// [`RoundState::resolve_roller`].
    pub roller: PlayerId,

    /// Player who opened the round.
    pub starter: PlayerId,

    /// Rolls made so far this round.
    pub rolls_elapsed: u32,
}

impl RoundState {
    /// Open a round with every player active and `starter` rolling first.
    #[must_use]
    pub fn opening(
        round_index: u32,
        starter: PlayerId,
        player_count: usize,
        config: &GameConfig,
    ) -> Self {
        Self {
            round_index,
            match_index: config.match_for_round(round_index),
            round_score: 0,
            active: PlayerId::all(player_count).collect(),
            roller: starter,
            starter,
            rolls_elapsed: 0,
        }
    }

    /// Check if a player is still active.
    #[must_use]
    pub fn is_active(&self, player: PlayerId) -> bool {
        self.active.contains(&player)
    }

    /// Active players in ascending id order.
    pub fn active_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.active.iter().copied()
    }

    /// Number of active players.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    #[must_use]
    pub fn has_active(&self) -> bool {
        !self.active.is_empty()
    }

    /// Remove a player from the round. Returns false if they were not active.
    pub(crate) fn deactivate(&mut self, player: PlayerId) -> bool {
        self.active.remove(&player).is_some()
    }

    /// The player who will actually roll next.
    ///
    /// If the recorded roller has banked, scan forward cyclically from the
    /// seat after them and take the first active player. `None` when no one
    /// is active.
    #[must_use]
    pub fn resolve_roller(&self, player_count: usize) -> Option<PlayerId> {
        if self.is_active(self.roller) {
            return Some(self.roller);
        }
        (1..=player_count)
            .map(|offset| PlayerId::new(((self.roller.index() + offset) % player_count) as u8))
            .find(|p| self.is_active(*p))
    }
}

/// Summary of one completed match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub match_index: u32,

    /// First round of the match.
    pub round_start: u32,

    /// Last round of the match.
    pub round_end: u32,

    /// Points each player gained during the match.
    pub score_deltas: PlayerMap<u64>,

    /// Totals when the match ended.
    pub totals_after: PlayerMap<u64>,

    /// Statistics each player accrued during the match.
    pub stats_deltas: PlayerMap<StatsDelta>,
}

/// Whole-game state, owned by a single rules engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    config: GameConfig,
    players: PlayerMap<Player>,
    totals: PlayerMap<u64>,
    stats: PlayerMap<PlayerStatistics>,
    round: RoundState,
    match_summaries: Vec<MatchSummary>,
    game_over: bool,
}

impl GameState {
    /// Seat the players and open round 1 with player 0 starting.
    pub(crate) fn new(names: &[String], config: GameConfig) -> Self {
        let player_count = names.len();
        Self {
            config,
            players: PlayerMap::new(player_count, |p| Player::new(p, names[p.index()].clone())),
            totals: PlayerMap::with_value(player_count, 0),
            stats: PlayerMap::with_default(player_count),
            round: RoundState::opening(1, PlayerId::new(0), player_count, &config),
            match_summaries: Vec::new(),
            game_over: false,
        }
    }

    // === Queries ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// Iterate over all player IDs.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.player_count())
    }

    #[must_use]
    pub fn players(&self) -> &PlayerMap<Player> {
        &self.players
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> &Player {
        &self.players[player]
    }

    #[must_use]
    pub fn totals(&self) -> &PlayerMap<u64> {
        &self.totals
    }

    #[must_use]
    pub fn total(&self, player: PlayerId) -> u64 {
        self.totals[player]
    }

    #[must_use]
    pub fn stats(&self, player: PlayerId) -> &PlayerStatistics {
        &self.stats[player]
    }

    #[must_use]
    pub fn all_stats(&self) -> &PlayerMap<PlayerStatistics> {
        &self.stats
    }

    #[must_use]
    pub fn round(&self) -> &RoundState {
        &self.round
    }

    #[must_use]
    pub fn match_summaries(&self) -> &[MatchSummary] {
        &self.match_summaries
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Whether the player is active or has banked this round.
    #[must_use]
    pub fn round_status(&self, player: PlayerId) -> RoundStatus {
        if self.round.is_active(player) {
            RoundStatus::Active
        } else {
            RoundStatus::Banked
        }
    }

    /// Who rolls next, or `None` if the game is over or no one is active.
    #[must_use]
    pub fn current_roller(&self) -> Option<PlayerId> {
        if self.game_over {
            return None;
        }
        self.round.resolve_roller(self.player_count())
    }

    // === Mutation (engine only) ===

    pub(crate) fn round_mut(&mut self) -> &mut RoundState {
        &mut self.round
    }

    pub(crate) fn stats_mut(&mut self, player: PlayerId) -> &mut PlayerStatistics {
        &mut self.stats[player]
    }

    /// Credit a bank to a player's total, returning the new total.
    pub(crate) fn credit(&mut self, player: PlayerId, amount: u64) -> u64 {
        let total = &mut self.totals[player];
        *total = total.saturating_add(amount);
        *total
    }

    pub(crate) fn replace_round(&mut self, round: RoundState) {
        self.round = round;
    }

    pub(crate) fn push_match_summary(&mut self, summary: MatchSummary) {
        self.match_summaries.push(summary);
    }

    pub(crate) fn finish(&mut self) {
        self.game_over = true;
    }
}
