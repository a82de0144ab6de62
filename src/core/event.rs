//! Game events.
//!
//! Every action produces an ordered list of events. The engine's event log
//! is the authoritative history of a game; views are rebuilt from it.
//!
//! Each kind carries only its own typed payload. Serialized, events are
//! internally tagged with a snake_case `type` field:
//!
//! ```
//! use bank_dice::core::{Event, PlayerId};
//!
//! let event = Event::Roll {
//!     player_id: PlayerId::new(0),
//!     die: 4,
//!     round_score_before: 6,
//!     round_score_after: 10,
//! };
//! assert_eq!(event.kind(), "roll");
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::player::{PlayerId, PlayerMap};
use super::state::MatchSummary;

/// Players hit by a bust, ascending. Inline for typical table sizes.
pub type AffectedPlayers = SmallVec<[PlayerId; 8]>;

/// Why a round concluded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundEndReason {
    /// The roller rolled a 1.
    Bust,
    /// Every player banked.
    AllBank,
}

impl RoundEndReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RoundEndReason::Bust => "bust",
            RoundEndReason::AllBank => "all_bank",
        }
    }
}

impl std::fmt::Display for RoundEndReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something that happened in the game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// The roller rolled the die.
    Roll {
        player_id: PlayerId,
        die: u8,
        round_score_before: u64,
        round_score_after: u64,
    },

    /// The roll was a 1; everyone still active lost the round score.
    Bust {
        player_id: PlayerId,
        round_score_before: u64,
        affected_players: AffectedPlayers,
    },

    /// A player banked the round score.
    Bank {
        player_id: PlayerId,
        amount: u64,
        /// Shared round score after the bank (banking never changes it).
        round_score: u64,
        total_score: u64,
        rolls_elapsed_in_round: u32,
    },

    /// A round concluded.
    RoundEnd {
        round_index: u32,
        reason: RoundEndReason,
        totals: PlayerMap<u64>,
    },

    /// A match concluded.
    MatchEnd {
        match_index: u32,
        summary: MatchSummary,
    },

    /// The final round concluded; nothing further happens.
    GameEnd { totals: PlayerMap<u64> },
}

impl Event {
    /// The snake_case tag of this event.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Roll { .. } => "roll",
            Event::Bust { .. } => "bust",
            Event::Bank { .. } => "bank",
            Event::RoundEnd { .. } => "round_end",
            Event::MatchEnd { .. } => "match_end",
            Event::GameEnd { .. } => "game_end",
        }
    }

    /// The acting player, for roll, bust and bank events.
    #[must_use]
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            Event::Roll { player_id, .. }
            | Event::Bust { player_id, .. }
            | Event::Bank { player_id, .. } => Some(*player_id),
            _ => None,
        }
    }

    /// Whether this event ends the game.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Event::GameEnd { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_event_kinds() {
        let bust = Event::Bust {
            player_id: PlayerId::new(1),
            round_score_before: 9,
            affected_players: smallvec![PlayerId::new(0), PlayerId::new(1)],
        };
        assert_eq!(bust.kind(), "bust");
        assert_eq!(bust.player(), Some(PlayerId::new(1)));
        assert!(!bust.is_terminal());

        let end = Event::GameEnd {
            totals: PlayerMap::with_value(2, 0),
        };
        assert_eq!(end.kind(), "game_end");
        assert_eq!(end.player(), None);
        assert!(end.is_terminal());
    }

    #[test]
    fn test_round_end_reason_strings() {
        assert_eq!(RoundEndReason::Bust.to_string(), "bust");
        assert_eq!(RoundEndReason::AllBank.to_string(), "all_bank");
    }

    #[test]
    fn test_event_serialization() {
        let event = Event::RoundEnd {
            round_index: 3,
            reason: RoundEndReason::AllBank,
            totals: PlayerMap::new(2, |p| p.index() as u64 * 4),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "round_end");
        assert_eq!(json["reason"], "all_bank");
        assert_eq!(json["totals"], serde_json::json!([0, 4]));

        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
