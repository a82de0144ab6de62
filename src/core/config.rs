//! Game length configuration.
//!
//! A game is a fixed number of matches, each a fixed number of rounds.
//! The standard game is 3 matches of 10 rounds.

use serde::{Deserialize, Serialize};

use super::error::{GameError, GameResult};

/// Rounds per match in the standard game.
pub const DEFAULT_ROUNDS_PER_MATCH: u32 = 10;

/// Matches per game in the standard game.
pub const DEFAULT_MATCHES_PER_GAME: u32 = 3;

/// Minimum number of seated players.
pub const MIN_PLAYERS: usize = 2;

/// Maximum number of seated players (bounded by `PlayerId(u8)`).
pub const MAX_PLAYERS: usize = 255;

/// Length of a game.
///
/// ```
/// use bank_dice::core::GameConfig;
///
/// let config = GameConfig::default();
/// assert_eq!(config.total_rounds(), 30);
/// assert_eq!(config.match_for_round(10), 1);
/// assert_eq!(config.match_for_round(11), 2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Rounds making up one match.
    pub rounds_per_match: u32,

    /// Matches making up the whole game.
    pub matches_per_game: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rounds_per_match: DEFAULT_ROUNDS_PER_MATCH,
            matches_per_game: DEFAULT_MATCHES_PER_GAME,
        }
    }
}

impl GameConfig {
    /// Create the standard configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set rounds per match.
    #[must_use]
    pub fn with_rounds_per_match(mut self, rounds: u32) -> Self {
        self.rounds_per_match = rounds;
        self
    }

    /// Set matches per game.
    #[must_use]
    pub fn with_matches_per_game(mut self, matches: u32) -> Self {
        self.matches_per_game = matches;
        self
    }

    /// Index of the last round; the game ends when it concludes.
    #[must_use]
    pub fn total_rounds(&self) -> u32 {
        self.rounds_per_match * self.matches_per_game
    }

    /// 1-based match index containing a 1-based round index.
    #[must_use]
    pub fn match_for_round(&self, round: u32) -> u32 {
        (round - 1) / self.rounds_per_match + 1
    }

    /// Whether concluding this round also concludes a match.
    #[must_use]
    pub fn is_match_boundary(&self, round: u32) -> bool {
        round % self.rounds_per_match == 0
    }

    /// First and last round index of a match.
    #[must_use]
    pub fn round_span(&self, match_index: u32) -> (u32, u32) {
        let end = match_index * self.rounds_per_match;
        (end - self.rounds_per_match + 1, end)
    }

    /// Check the configuration describes a playable game whose round count
    /// fits in a `u32`.
    pub fn validate(&self) -> GameResult<()> {
        if self.rounds_per_match == 0 {
            return Err(GameError::InvalidConfiguration(
                "rounds_per_match must be at least 1".to_string(),
            ));
        }
        if self.matches_per_game == 0 {
            return Err(GameError::InvalidConfiguration(
                "matches_per_game must be at least 1".to_string(),
            ));
        }
        if self
            .rounds_per_match
            .checked_mul(self.matches_per_game)
            .is_none()
        {
            return Err(GameError::InvalidConfiguration(format!(
                "{} matches of {} rounds is too many rounds",
                self.matches_per_game, self.rounds_per_match
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.rounds_per_match, 10);
        assert_eq!(config.matches_per_game, 3);
        assert_eq!(config.total_rounds(), 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_match_for_round() {
        let config = GameConfig::default();
        let matches: Vec<_> = [1, 9, 10, 11, 20, 21, 30]
            .iter()
            .map(|&r| config.match_for_round(r))
            .collect();
        assert_eq!(matches, vec![1, 1, 1, 2, 2, 3, 3]);
    }

    #[test]
    fn test_match_boundary_and_span() {
        let config = GameConfig::default();
        assert!(config.is_match_boundary(10));
        assert!(config.is_match_boundary(30));
        assert!(!config.is_match_boundary(15));
        assert_eq!(config.round_span(1), (1, 10));
        assert_eq!(config.round_span(3), (21, 30));
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new().with_rounds_per_match(2).with_matches_per_game(2);
        assert_eq!(config.total_rounds(), 4);
        assert_eq!(config.match_for_round(3), 2);
    }

    #[test]
    fn test_invalid_config() {
        assert!(GameConfig::new().with_rounds_per_match(0).validate().is_err());
        assert!(GameConfig::new().with_matches_per_game(0).validate().is_err());
    }

    #[test]
    fn test_round_count_overflow_rejected() {
        let config = GameConfig::new()
            .with_rounds_per_match(u32::MAX)
            .with_matches_per_game(2);
        assert!(matches!(config.validate(), Err(GameError::InvalidConfiguration(_))));

        let single = GameConfig::new()
            .with_rounds_per_match(u32::MAX)
            .with_matches_per_game(1);
        assert!(single.validate().is_ok());
        assert_eq!(single.total_rounds(), u32::MAX);
        assert_eq!(single.round_span(1), (1, u32::MAX));
    }
}
