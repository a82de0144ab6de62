//! The rules engine.
//!
//! Applies one action at a time against the game state:
//! - Validates the action before touching anything
//! - Mutates totals, statistics and the round
//! - Appends events to the game's log
//! - Runs round, match and game end synchronously when triggered

use std::cmp::Ordering;

use im::Vector;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use crate::core::config::{MAX_PLAYERS, MIN_PLAYERS};
use crate::core::{
    Action, AffectedPlayers, DieSource, Event, GameConfig, GameError, GameResult, GameState,
    MatchSummary, PlayerId, PlayerMap, RoundEndReason, RoundState,
};
use crate::stats::{PlayerStatistics, StatsSnapshot};

/// Totals and statistics as they stood at the last match boundary.
#[derive(Clone, Debug)]
struct MatchBaseline {
    stats: PlayerMap<StatsSnapshot>,
    totals: PlayerMap<u64>,
}

impl MatchBaseline {
    fn capture(state: &GameState) -> Self {
        Self {
            stats: state.all_stats().map(|_, s| s.snapshot()),
            totals: state.totals().clone(),
        }
    }
}

/// Result of [`RulesEngine::rank_by_greed`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreedRanking {
    /// Highest average voluntary bank amount.
    pub biggest_banker: PlayerId,

    /// Highest average number of rolls waited before banking.
    pub most_patient: PlayerId,
}

/// Rules engine for one game.
///
/// Owns the game state exclusively; callers observe it through
/// [`RulesEngine::state`] and advance it only through
/// [`RulesEngine::apply_action`].
///
/// ## Example
///
/// ```
/// use bank_dice::core::{Action, PlayerId, ScriptedDie};
/// use bank_dice::rules::RulesEngine;
///
/// let die = ScriptedDie::new(vec![6, 2]).unwrap();
/// let mut engine = RulesEngine::new(["Ann", "Bob"], die).unwrap();
///
/// engine.apply_action(Action::Roll).unwrap(); // 6
/// engine.apply_action(Action::Roll).unwrap(); // 2 doubles to 12
/// engine.apply_action(Action::Bank(PlayerId::new(1))).unwrap();
///
/// assert_eq!(engine.state().total(PlayerId::new(1)), 12);
/// assert_eq!(engine.current_roller(), Some(PlayerId::new(0)));
/// ```
pub struct RulesEngine {
    state: GameState,
    die: Box<dyn DieSource>,
    events: Vector<Event>,
    baseline: MatchBaseline,
}

impl RulesEngine {
    /// Seat the named players in order and open round 1.
    ///
    /// Fails with `InvalidConfiguration` for fewer than two players.
    pub fn new<I, S>(names: I, die: impl DieSource + 'static) -> GameResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_config(names, die, GameConfig::default())
    }

    /// Like [`RulesEngine::new`] with a custom game length.
    pub fn with_config<I, S>(
        names: I,
        die: impl DieSource + 'static,
        config: GameConfig,
    ) -> GameResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        config.validate()?;
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() < MIN_PLAYERS {
            return Err(GameError::InvalidConfiguration(format!(
                "at least {} players required, got {}",
                MIN_PLAYERS,
                names.len()
            )));
        }
        if names.len() > MAX_PLAYERS {
            return Err(GameError::InvalidConfiguration(format!(
                "at most {} players supported, got {}",
                MAX_PLAYERS,
                names.len()
            )));
        }

        let state = GameState::new(&names, config);
        let baseline = MatchBaseline::capture(&state);
        debug!("new game with {} players", names.len());

        Ok(Self {
            state,
            die: Box::new(die),
            events: Vector::new(),
            baseline,
        })
    }

    // === Queries ===

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Every event emitted so far, in order.
    #[must_use]
    pub fn events(&self) -> &Vector<Event> {
        &self.events
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Who rolls next, skipping players who banked since the last roll.
    #[must_use]
    pub fn current_roller(&self) -> Option<PlayerId> {
        self.state.current_roller()
    }

    /// Actions legal right now: a bank for each active player in ascending
    /// order, then a roll. Empty when the game is over or nobody is active.
    #[must_use]
    pub fn valid_actions(&self) -> Vec<Action> {
        let round = self.state.round();
        if self.state.is_game_over() || !round.has_active() {
            return Vec::new();
        }
        round
            .active_players()
            .map(Action::Bank)
            .chain(std::iter::once(Action::Roll))
            .collect()
    }

    /// Find the greediest players.
    ///
    /// Ties go to the higher total score, then to the lexicographically
    /// smallest name.
    pub fn rank_by_greed(&self) -> GameResult<GreedRanking> {
        Ok(GreedRanking {
            biggest_banker: self.greediest_by(PlayerStatistics::avg_voluntary_bank)?,
            most_patient: self.greediest_by(PlayerStatistics::avg_rolls_elapsed_before_bank)?,
        })
    }

    fn greediest_by(&self, key: impl Fn(&PlayerStatistics) -> f64) -> GameResult<PlayerId> {
        let state = &self.state;
        let compare = |a: PlayerId, b: PlayerId| {
            key(state.stats(a))
                .partial_cmp(&key(state.stats(b)))
                .unwrap_or(Ordering::Equal)
                .then_with(|| state.total(a).cmp(&state.total(b)))
                .then_with(|| state.player(b).name.cmp(&state.player(a).name))
        };

        let mut best: Option<PlayerId> = None;
        for player in state.player_ids() {
            match best {
                Some(current) if compare(player, current) != Ordering::Greater => {}
                _ => best = Some(player),
            }
        }
        best.ok_or(GameError::NoPlayers)
    }

    // === Actions ===

    /// Apply one action and return the events it produced directly.
    ///
    /// A roll yields a `roll` event, or `roll` then `bust`; a bank yields a
    /// `bank` event. Round, match and game end events triggered by the
    /// action are appended to [`RulesEngine::events`] in the same call.
    /// Once the game is over every action is a no-op returning no events.
    ///
    /// On error nothing has changed.
    pub fn apply_action(&mut self, action: Action) -> GameResult<Vec<Event>> {
        if self.state.is_game_over() {
            return Ok(Vec::new());
        }
        trace!("round {}: applying {}", self.state.round().round_index, action);
        match action {
            Action::Roll => self.roll(),
            Action::Bank(player) => self.bank(player),
        }
    }

    fn roll(&mut self) -> GameResult<Vec<Event>> {
        let roller = self
            .state
            .round()
            .resolve_roller(self.state.player_count())
            .ok_or(GameError::IllegalAction {
                action: Action::Roll,
                reason: "no active players",
            })?;
        let die = self.die.draw()?;

        self.state.round_mut().roller = roller;
        self.state.stats_mut(roller).record_roll();
        let before = self.state.round().round_score;

        if die == 1 {
            self.state.stats_mut(roller).record_one();
            let affected: AffectedPlayers = self.state.round().active_players().collect();
            for &player in &affected {
                self.state.stats_mut(player).record_forced_zero(before);
            }

            let round = self.state.round_mut();
            round.round_score = 0;
            round.rolls_elapsed += 1;

            let events = vec![
                Event::Roll {
                    player_id: roller,
                    die,
                    round_score_before: before,
                    round_score_after: 0,
                },
                Event::Bust {
                    player_id: roller,
                    round_score_before: before,
                    affected_players: affected,
                },
            ];
            self.events.extend(events.iter().cloned());
            self.end_round(RoundEndReason::Bust);
            return Ok(events);
        }

        let after = match die {
            2 if before == 0 => 2,
            2 => before.saturating_mul(2),
            _ => before.saturating_add(u64::from(die)),
        };
        let round = self.state.round_mut();
        round.round_score = after;
        round.rolls_elapsed += 1;

        let event = Event::Roll {
            player_id: roller,
            die,
            round_score_before: before,
            round_score_after: after,
        };
        self.events.push_back(event.clone());
        Ok(vec![event])
    }

    fn bank(&mut self, player: PlayerId) -> GameResult<Vec<Event>> {
        if !self.state.round().is_active(player) {
            return Err(GameError::IllegalAction {
                action: Action::Bank(player),
                reason: "player is not active",
            });
        }

        let round = self.state.round_mut();
        round.deactivate(player);
        let amount = round.round_score;
        let rolls_elapsed = round.rolls_elapsed;

        let total = self.state.credit(player, amount);
        self.state
            .stats_mut(player)
            .record_voluntary_bank(amount, rolls_elapsed);

        let event = Event::Bank {
            player_id: player,
            amount,
            round_score: amount,
            total_score: total,
            rolls_elapsed_in_round: rolls_elapsed,
        };
        self.events.push_back(event.clone());

        if !self.state.round().has_active() {
            self.end_round(RoundEndReason::AllBank);
        }
        Ok(vec![event])
    }

    // === Lifecycle ===

    fn end_round(&mut self, reason: RoundEndReason) {
        let config = *self.state.config();
        let round_index = self.state.round().round_index;
        let match_index = self.state.round().match_index;

        debug!("round {} ended: {}", round_index, reason);
        self.events.push_back(Event::RoundEnd {
            round_index,
            reason,
            totals: self.state.totals().clone(),
        });

        if config.is_match_boundary(round_index) {
            self.end_match(match_index);
        }

        if round_index >= config.total_rounds() {
            self.state.finish();
            info!(
                "game over after round {}: totals {:?}",
                round_index,
                self.state.totals().as_slice()
            );
            self.events.push_back(Event::GameEnd {
                totals: self.state.totals().clone(),
            });
            return;
        }

        let player_count = self.state.player_count();
        let starter = self.state.round().starter.next(player_count);
        let next = RoundState::opening(round_index + 1, starter, player_count, &config);
        self.state.replace_round(next);
    }

    fn end_match(&mut self, match_index: u32) {
        let (round_start, round_end) = self.state.config().round_span(match_index);
        let totals = self.state.totals();
        let summary = MatchSummary {
            match_index,
            round_start,
            round_end,
            score_deltas: totals.map(|p, total| total - self.baseline.totals[p]),
            totals_after: totals.clone(),
            stats_deltas: self
                .state
                .all_stats()
                .map(|p, stats| stats.delta_since(&self.baseline.stats[p])),
        };

        debug!("match {} ended (rounds {}-{})", match_index, round_start, round_end);
        self.state.push_match_summary(summary.clone());
        self.events.push_back(Event::MatchEnd {
            match_index,
            summary,
        });
        self.baseline = MatchBaseline::capture(&self.state);
    }
}

impl std::fmt::Debug for RulesEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RulesEngine")
            .field("state", &self.state)
            .field("events", &self.events.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScriptedDie;

    fn engine(players: usize, faces: Vec<u8>) -> RulesEngine {
        let names: Vec<String> = (0..players).map(|i| format!("P{}", i)).collect();
        RulesEngine::new(names, ScriptedDie::new(faces).unwrap()).unwrap()
    }

    fn p(id: u8) -> PlayerId {
        PlayerId::new(id)
    }

    #[test]
    fn test_requires_two_players() {
        let err = RulesEngine::new(["Solo"], ScriptedDie::empty()).unwrap_err();
        assert!(matches!(err, GameError::InvalidConfiguration(_)));

        let none: [&str; 0] = [];
        assert!(RulesEngine::new(none, ScriptedDie::empty()).is_err());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = GameConfig::new().with_rounds_per_match(0);
        let err = RulesEngine::with_config(["A", "B"], ScriptedDie::empty(), config).unwrap_err();
        assert!(matches!(err, GameError::InvalidConfiguration(_)));

        let overflowing = GameConfig::new()
            .with_rounds_per_match(u32::MAX)
            .with_matches_per_game(2);
        let err =
            RulesEngine::with_config(["A", "B"], ScriptedDie::empty(), overflowing).unwrap_err();
        assert!(matches!(err, GameError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_scoring_rules() {
        let mut e = engine(2, vec![2, 3, 2, 6]);
        let scores: Vec<u64> = (0..4)
            .map(|_| {
                e.apply_action(Action::Roll).unwrap();
                e.state().round().round_score
            })
            .collect();
        assert_eq!(scores, vec![2, 5, 10, 16]);
        assert_eq!(e.state().round().rolls_elapsed, 4);
    }

    #[test]
    fn test_roll_event_payload() {
        let mut e = engine(2, vec![5]);
        let events = e.apply_action(Action::Roll).unwrap();
        assert_eq!(
            events,
            vec![Event::Roll {
                player_id: p(0),
                die: 5,
                round_score_before: 0,
                round_score_after: 5,
            }]
        );
    }

    #[test]
    fn test_roller_does_not_rotate_between_rolls() {
        let mut e = engine(3, vec![4, 4]);
        e.apply_action(Action::Roll).unwrap();
        let events = e.apply_action(Action::Roll).unwrap();
        assert_eq!(events[0].player(), Some(p(0)));
    }

    #[test]
    fn test_bust_returns_roll_and_bust() {
        let mut e = engine(3, vec![6, 1]);
        e.apply_action(Action::Roll).unwrap();
        e.apply_action(Action::Bank(p(1))).unwrap();
        let events = e.apply_action(Action::Roll).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind(), "roll");
        match &events[1] {
            Event::Bust {
                player_id,
                round_score_before,
                affected_players,
            } => {
                assert_eq!(*player_id, p(0));
                assert_eq!(*round_score_before, 6);
                assert_eq!(affected_players.as_slice(), &[p(0), p(2)]);
            }
            other => panic!("expected bust, got {:?}", other),
        }

        // Round 2 opened with the next starter.
        assert_eq!(e.state().round().round_index, 2);
        assert_eq!(e.state().round().starter, p(1));
        assert_eq!(e.state().round().round_score, 0);
        assert_eq!(e.state().round().active_count(), 3);
    }

    #[test]
    fn test_bust_logs_round_end() {
        let mut e = engine(2, vec![1]);
        e.apply_action(Action::Roll).unwrap();
        let kinds: Vec<_> = e.events().iter().map(Event::kind).collect();
        assert_eq!(kinds, vec!["roll", "bust", "round_end"]);
        match e.events().back() {
            Some(Event::RoundEnd { reason, round_index, .. }) => {
                assert_eq!(*reason, RoundEndReason::Bust);
                assert_eq!(*round_index, 1);
            }
            other => panic!("expected round_end, got {:?}", other),
        }
    }

    #[test]
    fn test_bank_event_payload() {
        let mut e = engine(3, vec![4]);
        e.apply_action(Action::Roll).unwrap();
        let events = e.apply_action(Action::Bank(p(2))).unwrap();
        assert_eq!(
            events,
            vec![Event::Bank {
                player_id: p(2),
                amount: 4,
                round_score: 4,
                total_score: 4,
                rolls_elapsed_in_round: 1,
            }]
        );
        assert_eq!(e.state().round().round_score, 4);
    }

    #[test]
    fn test_bank_inactive_player_is_rejected() {
        let mut e = engine(2, vec![]);
        e.apply_action(Action::Bank(p(0))).unwrap();
        let err = e.apply_action(Action::Bank(p(0))).unwrap_err();
        assert!(matches!(err, GameError::IllegalAction { .. }));
        assert_eq!(e.events().len(), 1);
    }

    #[test]
    fn test_bank_unknown_player_is_rejected() {
        let mut e = engine(2, vec![]);
        assert!(e.apply_action(Action::Bank(p(9))).is_err());
    }

    #[test]
    fn test_exhausted_source_leaves_state_unchanged() {
        let mut e = engine(2, vec![]);
        let before = e.state().clone();
        let err = e.apply_action(Action::Roll).unwrap_err();
        assert_eq!(err, GameError::ExhaustedSource { consumed: 0 });
        assert_eq!(e.state().round(), before.round());
        assert_eq!(e.state().all_stats(), before.all_stats());
        assert!(e.events().is_empty());
    }

    #[test]
    fn test_valid_actions() {
        let mut e = engine(3, vec![3]);
        assert_eq!(
            e.valid_actions(),
            vec![Action::Bank(p(0)), Action::Bank(p(1)), Action::Bank(p(2)), Action::Roll]
        );

        e.apply_action(Action::Roll).unwrap();
        e.apply_action(Action::Bank(p(1))).unwrap();
        assert_eq!(
            e.valid_actions(),
            vec![Action::Bank(p(0)), Action::Bank(p(2)), Action::Roll]
        );
    }

    #[test]
    fn test_current_roller_skips_banked() {
        let mut e = engine(3, vec![3]);
        e.apply_action(Action::Roll).unwrap();
        e.apply_action(Action::Bank(p(0))).unwrap();
        assert_eq!(e.current_roller(), Some(p(1)));

        e.apply_action(Action::Bank(p(1))).unwrap();
        assert_eq!(e.current_roller(), Some(p(2)));
    }

    #[test]
    fn test_rank_by_greed_tie_breaks() {
        // Nobody banked anything: all averages 0.0, totals 0, so smallest name wins.
        let e = RulesEngine::new(["Zed", "Amy", "Bo"], ScriptedDie::empty()).unwrap();
        let ranking = e.rank_by_greed().unwrap();
        assert_eq!(ranking.biggest_banker, p(1));
        assert_eq!(ranking.most_patient, p(1));
    }

    #[test]
    fn test_rank_by_greed() {
        let mut e = engine(3, vec![6, 6, 1]);
        e.apply_action(Action::Roll).unwrap();
        e.apply_action(Action::Bank(p(2))).unwrap(); // 6 after 1 roll
        e.apply_action(Action::Roll).unwrap();
        e.apply_action(Action::Bank(p(1))).unwrap(); // 12 after 2 rolls
        e.apply_action(Action::Roll).unwrap(); // bust for p0

        let ranking = e.rank_by_greed().unwrap();
        assert_eq!(ranking.biggest_banker, p(1));
        assert_eq!(ranking.most_patient, p(1));
    }

    #[test]
    fn test_short_game_ends() {
        let config = GameConfig::new().with_rounds_per_match(1).with_matches_per_game(2);
        let mut e = RulesEngine::with_config(["A", "B"], ScriptedDie::empty(), config).unwrap();
        for _ in 0..2 {
            e.apply_action(Action::Bank(p(0))).unwrap();
            e.apply_action(Action::Bank(p(1))).unwrap();
        }
        assert!(e.is_game_over());
        assert_eq!(e.state().match_summaries().len(), 2);
        assert!(e.valid_actions().is_empty());
        assert_eq!(e.apply_action(Action::Roll).unwrap(), Vec::new());
        assert!(e.events().back().map_or(false, Event::is_terminal));
    }
}
