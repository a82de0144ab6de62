//! Batch game runner.
//!
//! Plays whole games with policy-driven players and aggregates results.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::core::config::{MAX_PLAYERS, MIN_PLAYERS};
use crate::core::{
    Action, DieSource, GameConfig, GameError, GameResult, PlayerId, PlayerMap, RandomDie,
};
use crate::policy::BankingPolicy;
use crate::rules::RulesEngine;

/// Configuration for a batch of simulated games.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    /// Number of games to play.
    pub games: u32,

    /// Seed for the dice. `None` seeds from OS entropy.
    pub seed: Option<u64>,

    /// Length of each game.
    pub game: GameConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            games: 1000,
            seed: None,
            game: GameConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of games.
    pub fn with_games(mut self, games: u32) -> Self {
        self.games = games;
        self
    }

    /// Make the batch reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the game length.
    pub fn with_game_config(mut self, game: GameConfig) -> Self {
        self.game = game;
        self
    }
}

/// Aggregated outcome of a batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub players: Vec<String>,
    pub games: u32,

    /// Sum of final totals per player over all games.
    pub totals: PlayerMap<u64>,

    /// Games each player won. Everyone tied for the top score gets a win.
    pub wins: PlayerMap<u32>,
}

impl SimulationResult {
    /// Fraction of games won, 0.0 for an empty batch.
    #[must_use]
    pub fn win_rate(&self, player: PlayerId) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            f64::from(self.wins[player]) / f64::from(self.games)
        }
    }

    /// Mean final total, 0.0 for an empty batch.
    #[must_use]
    pub fn avg_score(&self, player: PlayerId) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.totals[player] as f64 / f64::from(self.games)
        }
    }
}

/// Play one game to completion and return the final totals.
///
/// Before each roll every active player's policy is asked, in ascending id
/// order, whether to bank; all the resulting banks are applied, then the
/// roller rolls.
pub fn run_single_game(
    names: &[String],
    policies: &[Box<dyn BankingPolicy>],
    die: impl DieSource + 'static,
    config: GameConfig,
) -> GameResult<PlayerMap<u64>> {
    check_roster(names, policies)?;
    let mut engine = RulesEngine::with_config(names.iter().cloned(), die, config)?;

    while !engine.is_game_over() {
        let state = engine.state();
        let bankers: Vec<PlayerId> = state
            .round()
            .active_players()
            .filter(|&p| policies[p.index()].should_bank(state, p))
            .collect();

        for player in bankers {
            if engine.is_game_over() {
                break;
            }
            if engine.state().round().is_active(player) {
                engine.apply_action(Action::Bank(player))?;
            }
        }

        if engine.is_game_over() {
            break;
        }
        if !engine.state().round().has_active() {
            continue;
        }
        engine.apply_action(Action::Roll)?;
    }

    Ok(engine.state().totals().clone())
}

/// Play a batch of games with the same players and policies.
pub fn simulate(
    names: &[String],
    policies: &[Box<dyn BankingPolicy>],
    config: &SimulationConfig,
) -> GameResult<SimulationResult> {
    check_roster(names, policies)?;
    config.game.validate()?;

    let labels: Vec<String> = policies.iter().map(|p| p.label()).collect();
    info!("simulating {} games: {}", config.games, labels.join(", "));

    let mut dice = match config.seed {
        Some(seed) => RandomDie::seeded(seed),
        None => RandomDie::new(),
    };
    let mut totals: PlayerMap<u64> = PlayerMap::with_value(names.len(), 0);
    let mut wins: PlayerMap<u32> = PlayerMap::with_value(names.len(), 0);

    for game in 0..config.games {
        let scores = run_single_game(names, policies, dice.fork(), config.game)?;
        let best = scores.values().copied().max().unwrap_or(0);
        for (player, &score) in scores.iter() {
            totals[player] += score;
            if score == best {
                wins[player] += 1;
            }
        }
        debug!("game {} finished: {:?}", game + 1, scores.as_slice());
    }

    Ok(SimulationResult {
        players: names.to_vec(),
        games: config.games,
        totals,
        wins,
    })
}

/// Seat count within limits and exactly one policy per seat.
fn check_roster(names: &[String], policies: &[Box<dyn BankingPolicy>]) -> GameResult<()> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&names.len()) {
        return Err(GameError::InvalidConfiguration(format!(
            "between {} and {} players required, got {}",
            MIN_PLAYERS,
            MAX_PLAYERS,
            names.len()
        )));
    }
    if policies.len() != names.len() {
        return Err(GameError::InvalidConfiguration(format!(
            "{} policies for {} players",
            policies.len(),
            names.len()
        )));
    }
    Ok(())
}
