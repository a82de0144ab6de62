//! Batch simulator CLI for the dice banking game
//!
//! Usage: cargo run --bin bank-dice -- simulate --players A B --strategy greedy threshold:20

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};

use bank_dice::policy::{BankingPolicy, PolicySpec};
use bank_dice::sim::{simulate, SimulationConfig, SimulationResult};
use bank_dice::{GameResult, PlayerId};

/// Dice game simulator
#[derive(Parser, Debug)]
#[command(name = "bank-dice")]
#[command(about = "Simulate the dice banking game with scripted strategies", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate games
    Simulate {
        /// Player names, in seat order
        #[arg(long, num_args = 1.., required = true)]
        players: Vec<String>,

        /// One strategy per player: greedy, threshold:N or roll_limit:N
        #[arg(long, num_args = 1.., required = true)]
        strategy: Vec<PolicySpec>,

        /// Number of games to play
        #[arg(long, default_value_t = 1000)]
        games: u32,

        /// Random seed (omit for a fresh batch each run)
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Reject a strategy list that does not pair up with the players.
fn check_strategies(players: &[String], strategy: &[PolicySpec]) -> Result<(), clap::Error> {
    if strategy.len() == players.len() {
        return Ok(());
    }
    Err(Args::command().error(
        ErrorKind::WrongNumberOfValues,
        format!(
            "number of strategies ({}) must match number of players ({})",
            strategy.len(),
            players.len()
        ),
    ))
}

fn run_simulation(
    players: &[String],
    strategy: Vec<PolicySpec>,
    games: u32,
    seed: Option<u64>,
) -> GameResult<SimulationResult> {
    let policies: Vec<Box<dyn BankingPolicy>> =
        strategy.into_iter().map(PolicySpec::build).collect();
    let mut config = SimulationConfig::new().with_games(games);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    simulate(players, &policies, &config)
}

/// Output lines: the game count, then one line per player.
fn report(result: &SimulationResult) -> Vec<String> {
    let mut lines = vec![format!("Games: {}", result.games)];
    for (i, name) in result.players.iter().enumerate() {
        let player = PlayerId::new(i as u8);
        lines.push(format!(
            "{}: win_rate={:.3} avg_score={:.2}",
            name,
            result.win_rate(player),
            result.avg_score(player)
        ));
    }
    lines
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    match args.command {
        Command::Simulate {
            players,
            strategy,
            games,
            seed,
        } => {
            if let Err(err) = check_strategies(&players, &strategy) {
                err.exit();
            }
            let result = run_simulation(&players, strategy, games, seed)?;
            for line in report(&result) {
                println!("{}", line);
            }
        }
    }

    Ok(())
}
