//! Per-player statistics, snapshots and deltas.

use serde::{Deserialize, Serialize};

/// Running counters for one player over the whole game.
///
/// The two lists are append-only and parallel: entry `i` of
/// `voluntary_bank_amounts` and `rolls_elapsed_before_bank` describe the
/// same bank.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStatistics {
    /// 1s rolled by this player while acting as roller.
    pub ones_rolled: u32,

    /// Banks this player chose to make.
    pub voluntary_banks: u32,

    /// Rounds this player lost to a bust while still active.
    pub forced_zero_banks: u32,

    /// Amount banked, one entry per voluntary bank.
    pub voluntary_bank_amounts: Vec<u64>,

    /// Round score lost to busts while still active.
    pub missed_points: u64,

    /// Rolls made while acting as roller.
    pub rolls_taken_as_roller: u32,

    /// Rolls already made in the round at the moment of each voluntary bank.
    pub rolls_elapsed_before_bank: Vec<u32>,
}

impl PlayerStatistics {
    /// Create empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a voluntary bank of `amount` after `rolls_elapsed` rolls.
    pub(crate) fn record_voluntary_bank(&mut self, amount: u64, rolls_elapsed: u32) {
        self.voluntary_banks += 1;
        self.voluntary_bank_amounts.push(amount);
        self.rolls_elapsed_before_bank.push(rolls_elapsed);
    }

    /// Record losing `round_score` to someone's bust.
    pub(crate) fn record_forced_zero(&mut self, round_score: u64) {
        self.forced_zero_banks += 1;
        self.missed_points = self.missed_points.saturating_add(round_score);
    }

    pub(crate) fn record_roll(&mut self) {
        self.rolls_taken_as_roller += 1;
    }

    pub(crate) fn record_one(&mut self) {
        self.ones_rolled += 1;
    }

    /// Mean voluntary bank amount, 0.0 with no banks.
    #[must_use]
    pub fn avg_voluntary_bank(&self) -> f64 {
        mean(self.voluntary_bank_amounts.iter().map(|&v| v as f64))
    }

    /// Mean rolls elapsed before a voluntary bank, 0.0 with no banks.
    #[must_use]
    pub fn avg_rolls_elapsed_before_bank(&self) -> f64 {
        mean(self.rolls_elapsed_before_bank.iter().map(|&v| f64::from(v)))
    }

    /// Capture the current counters and list lengths.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            ones_rolled: self.ones_rolled,
            voluntary_banks: self.voluntary_banks,
            forced_zero_banks: self.forced_zero_banks,
            missed_points: self.missed_points,
            rolls_taken_as_roller: self.rolls_taken_as_roller,
            bank_amounts_len: self.voluntary_bank_amounts.len(),
            rolls_elapsed_len: self.rolls_elapsed_before_bank.len(),
        }
    }

    /// Everything accrued since `since` was taken.
    ///
    /// Counters subtract; lists yield the entries appended after the
    /// snapshot's recorded length.
    #[must_use]
    pub fn delta_since(&self, since: &StatsSnapshot) -> StatsDelta {
        StatsDelta {
            ones_rolled: self.ones_rolled - since.ones_rolled,
            voluntary_banks: self.voluntary_banks - since.voluntary_banks,
            forced_zero_banks: self.forced_zero_banks - since.forced_zero_banks,
            voluntary_bank_amounts: self.voluntary_bank_amounts[since.bank_amounts_len..].to_vec(),
            missed_points: self.missed_points - since.missed_points,
            rolls_taken_as_roller: self.rolls_taken_as_roller - since.rolls_taken_as_roller,
            rolls_elapsed_before_bank: self.rolls_elapsed_before_bank[since.rolls_elapsed_len..]
                .to_vec(),
        }
    }
}

/// Point-in-time copy of a player's counters.
///
/// Lists are not copied; only their lengths are kept, which is enough to
/// slice off what was appended later.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub ones_rolled: u32,
    pub voluntary_banks: u32,
    pub forced_zero_banks: u32,
    pub missed_points: u64,
    pub rolls_taken_as_roller: u32,
    pub bank_amounts_len: usize,
    pub rolls_elapsed_len: usize,
}

/// Statistics accrued between a snapshot and a later point.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsDelta {
    pub ones_rolled: u32,
    pub voluntary_banks: u32,
    pub forced_zero_banks: u32,
    pub voluntary_bank_amounts: Vec<u64>,
    pub missed_points: u64,
    pub rolls_taken_as_roller: u32,
    pub rolls_elapsed_before_bank: Vec<u32>,
}

impl StatsDelta {
    #[must_use]
    pub fn avg_voluntary_bank(&self) -> f64 {
        mean(self.voluntary_bank_amounts.iter().map(|&v| v as f64))
    }

    #[must_use]
    pub fn avg_rolls_elapsed_before_bank(&self) -> f64 {
        mean(self.rolls_elapsed_before_bank.iter().map(|&v| f64::from(v)))
    }

    /// Total banked over the interval.
    #[must_use]
    pub fn banked_points(&self) -> u64 {
        self.voluntary_bank_amounts.iter().sum()
    }
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let len = values.len();
    if len == 0 {
        0.0
    } else {
        values.sum::<f64>() / len as f64
    }
}
