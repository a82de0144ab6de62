//! Banking policies for simulated players.

use std::str::FromStr;

use thiserror::Error;

use crate::core::{GameState, PlayerId};

// =============================================================================
// Policy trait
// =============================================================================

/// Decides whether a player banks before the next roll.
pub trait BankingPolicy: Send + Sync {
    /// Return true to bank now. Only asked about active players.
    fn should_bank(&self, state: &GameState, player: PlayerId) -> bool;

    /// Short label used in reports, in the same form [`parse_policy`] accepts.
    fn label(&self) -> String;
}

// =============================================================================
// Reference policies
// =============================================================================

/// Round score no real game reaches; "never bank" in practice.
pub const NEVER_BANK_THRESHOLD: u64 = 999_999;

/// Rides every round to the end.
///
/// Modelled as a threshold no round score reaches, so it still banks if a
/// round somehow gets there.
#[derive(Clone, Debug, Default)]
pub struct NeverBank;

impl BankingPolicy for NeverBank {
    fn should_bank(&self, state: &GameState, _player: PlayerId) -> bool {
        state.round().round_score >= NEVER_BANK_THRESHOLD
    }

    fn label(&self) -> String {
        "greedy".to_string()
    }
}

/// Banks once the round score reaches a fixed threshold.
#[derive(Clone, Debug)]
pub struct ThresholdBank {
    pub threshold: u64,
}

impl ThresholdBank {
    #[must_use]
    pub fn new(threshold: u64) -> Self {
        Self { threshold }
    }
}

impl BankingPolicy for ThresholdBank {
    fn should_bank(&self, state: &GameState, _player: PlayerId) -> bool {
        state.round().round_score >= self.threshold
    }

    fn label(&self) -> String {
        format!("threshold:{}", self.threshold)
    }
}

/// Banks once a fixed number of rolls have been made this round.
#[derive(Clone, Debug)]
pub struct RollLimitBank {
    pub roll_limit: u32,
}

impl RollLimitBank {
    #[must_use]
    pub fn new(roll_limit: u32) -> Self {
        Self { roll_limit }
    }
}

impl BankingPolicy for RollLimitBank {
    fn should_bank(&self, state: &GameState, _player: PlayerId) -> bool {
        state.round().rolls_elapsed >= self.roll_limit
    }

    fn label(&self) -> String {
        format!("roll_limit:{}", self.roll_limit)
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// A policy description that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsePolicyError {
    #[error("unknown strategy: {0}")]
    Unknown(String),

    #[error("invalid number in strategy {spec:?}")]
    BadNumber { spec: String },
}

/// A parsed policy description: `greedy`, `threshold:N` or `roll_limit:N`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolicySpec {
    Greedy,
    Threshold(u64),
    RollLimit(u32),
}

impl PolicySpec {
    /// Instantiate the described policy.
    #[must_use]
    pub fn build(self) -> Box<dyn BankingPolicy> {
        match self {
            PolicySpec::Greedy => Box::new(NeverBank),
            PolicySpec::Threshold(t) => Box::new(ThresholdBank::new(t)),
            PolicySpec::RollLimit(n) => Box::new(RollLimitBank::new(n)),
        }
    }
}

impl FromStr for PolicySpec {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad_number = || ParsePolicyError::BadNumber { spec: s.to_string() };
        if s == "greedy" {
            return Ok(PolicySpec::Greedy);
        }
        if let Some(value) = s.strip_prefix("threshold:") {
            return value.parse().map(PolicySpec::Threshold).map_err(|_| bad_number());
        }
        if let Some(value) = s.strip_prefix("roll_limit:") {
            return value.parse().map(PolicySpec::RollLimit).map_err(|_| bad_number());
        }
        Err(ParsePolicyError::Unknown(s.to_string()))
    }
}

/// Parse a policy description straight into a policy.
pub fn parse_policy(spec: &str) -> Result<Box<dyn BankingPolicy>, ParsePolicyError> {
    spec.parse::<PolicySpec>().map(PolicySpec::build)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Action, ScriptedDie};
    use crate::rules::RulesEngine;

    fn engine_after_rolls(faces: Vec<u8>) -> RulesEngine {
        let rolls = faces.len();
        let mut engine = RulesEngine::new(["A", "B"], ScriptedDie::new(faces).unwrap()).unwrap();
        for _ in 0..rolls {
            engine.apply_action(Action::Roll).unwrap();
        }
        engine
    }

    #[test]
    fn test_never_bank() {
        let engine = engine_after_rolls(vec![6, 6, 6, 6]);
        assert!(!NeverBank.should_bank(engine.state(), PlayerId::new(0)));
    }

    #[test]
    fn test_threshold_bank() {
        let policy = ThresholdBank::new(10);
        let engine = engine_after_rolls(vec![6]);
        assert!(!policy.should_bank(engine.state(), PlayerId::new(0)));

        let engine = engine_after_rolls(vec![6, 4]);
        assert!(policy.should_bank(engine.state(), PlayerId::new(0)));
    }

    #[test]
    fn test_roll_limit_bank() {
        let policy = RollLimitBank::new(2);
        let engine = engine_after_rolls(vec![3]);
        assert!(!policy.should_bank(engine.state(), PlayerId::new(1)));

        let engine = engine_after_rolls(vec![3, 3]);
        assert!(policy.should_bank(engine.state(), PlayerId::new(1)));
    }

    #[test]
    fn test_parse_policy_spec() {
        assert_eq!("greedy".parse::<PolicySpec>(), Ok(PolicySpec::Greedy));
        assert_eq!("threshold:25".parse::<PolicySpec>(), Ok(PolicySpec::Threshold(25)));
        assert_eq!("roll_limit:3".parse::<PolicySpec>(), Ok(PolicySpec::RollLimit(3)));
    }

    #[test]
    fn test_parse_policy_errors() {
        assert_eq!(
            "cautious".parse::<PolicySpec>(),
            Err(ParsePolicyError::Unknown("cautious".to_string()))
        );
        assert_eq!(
            "threshold:lots".parse::<PolicySpec>(),
            Err(ParsePolicyError::BadNumber { spec: "threshold:lots".to_string() })
        );
    }

    #[test]
    fn test_labels_round_trip() {
        for spec in ["greedy", "threshold:20", "roll_limit:4"] {
            assert_eq!(parse_policy(spec).unwrap().label(), spec);
        }
    }
}
