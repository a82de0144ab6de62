//! Read-model views of a game, shaped for a UI or an HTTP layer.
//!
//! Everything here is derived from `GameState` and the engine's legal
//! actions; nothing is stored.

use serde::{Deserialize, Serialize};

use crate::core::{Action, Event, GameState, PlayerId, RoundStatus};

/// One seated player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub total_score: u64,
    pub round_status: RoundStatus,
}

/// One player's statistics with derived averages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatsView {
    pub ones_rolled: u32,
    pub voluntary_banks: u32,
    pub forced_zero_banks: u32,
    pub missed_points: u64,
    pub rolls_taken_as_roller: u32,
    pub avg_voluntary_bank: f64,
    pub avg_rolls_elapsed_before_bank: f64,
}

/// Snapshot of a game for display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameView {
    pub players: Vec<PlayerView>,
    pub stats: Vec<PlayerStatsView>,
    pub round_score: u64,
    pub round_number: u32,
    pub match_number: u32,
    pub current_roller_id: Option<PlayerId>,
    pub starter_id: PlayerId,
    pub is_game_over: bool,
}

impl GameView {
    #[must_use]
    pub fn from_state(state: &GameState) -> Self {
        let round = state.round();
        let players = state
            .players()
            .values()
            .map(|player| PlayerView {
                id: player.id,
                name: player.name.clone(),
                total_score: state.total(player.id),
                round_status: state.round_status(player.id),
            })
            .collect();
        let stats = state
            .all_stats()
            .values()
            .map(|s| PlayerStatsView {
                ones_rolled: s.ones_rolled,
                voluntary_banks: s.voluntary_banks,
                forced_zero_banks: s.forced_zero_banks,
                missed_points: s.missed_points,
                rolls_taken_as_roller: s.rolls_taken_as_roller,
                avg_voluntary_bank: s.avg_voluntary_bank(),
                avg_rolls_elapsed_before_bank: s.avg_rolls_elapsed_before_bank(),
            })
            .collect();

        Self {
            players,
            stats,
            round_score: round.round_score,
            round_number: round.round_index,
            match_number: round.match_index,
            current_roller_id: state.current_roller(),
            starter_id: round.starter,
            is_game_over: state.is_game_over(),
        }
    }
}

/// What may be submitted next.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidActionsView {
    pub can_roll: bool,
    pub bankable_player_ids: Vec<PlayerId>,
}

impl ValidActionsView {
    #[must_use]
    pub fn from_actions(actions: &[Action]) -> Self {
        Self {
            can_roll: actions.iter().any(Action::is_roll),
            bankable_player_ids: actions.iter().filter_map(Action::player).collect(),
        }
    }
}

/// An event numbered within its session, starting at 1.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SequencedEvent {
    pub seq: u64,
    pub event: Event,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScriptedDie;
    use crate::rules::RulesEngine;

    #[test]
    fn test_game_view() {
        let die = ScriptedDie::new(vec![5]).unwrap();
        let mut engine = RulesEngine::new(["Ann", "Bob", "Cy"], die).unwrap();
        engine.apply_action(Action::Roll).unwrap();
        engine.apply_action(Action::Bank(PlayerId::new(0))).unwrap();

        let view = GameView::from_state(engine.state());
        assert_eq!(view.players[0].total_score, 5);
        assert_eq!(view.players[0].round_status, RoundStatus::Banked);
        assert_eq!(view.players[1].round_status, RoundStatus::Active);
        assert_eq!(view.stats[0].avg_voluntary_bank, 5.0);
        assert_eq!(view.stats[0].rolls_taken_as_roller, 1);
        assert_eq!(view.round_score, 5);
        assert_eq!(view.round_number, 1);
        assert_eq!(view.match_number, 1);
        assert_eq!(view.current_roller_id, Some(PlayerId::new(1)));
        assert_eq!(view.starter_id, PlayerId::new(0));
        assert!(!view.is_game_over);
    }

    #[test]
    fn test_valid_actions_view() {
        let view = ValidActionsView::from_actions(&[
            Action::Bank(PlayerId::new(0)),
            Action::Bank(PlayerId::new(2)),
            Action::Roll,
        ]);
        assert!(view.can_roll);
        assert_eq!(view.bankable_player_ids, vec![PlayerId::new(0), PlayerId::new(2)]);

        assert_eq!(ValidActionsView::from_actions(&[]), ValidActionsView::default());
    }

    #[test]
    fn test_round_status_serializes_upper_case() {
        let json = serde_json::to_string(&RoundStatus::Banked).unwrap();
        assert_eq!(json, r#""BANKED""#);
    }
}
