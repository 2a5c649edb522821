use anyhow::Result;
use clap::Parser;
use minesweeper_kb::util::{play, Minefield, Outcome};
use minesweeper_kb::{Agent, GameConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

/// Let the inference agent play random minesweeper games
#[derive(Parser)]
#[command(name = "minesweeper-kb")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Board height
    #[arg(long, default_value_t = GameConfig::default().height)]
    height: usize,

    /// Board width
    #[arg(long, default_value_t = GameConfig::default().width)]
    width: usize,

    /// Number of mines
    #[arg(long, default_value_t = GameConfig::default().mines)]
    mines: usize,

    /// How many games to play
    #[arg(long, default_value_t = 1)]
    games: usize,

    /// Seed for mine placement and guesses; random if omitted
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = GameConfig {
        height: cli.height,
        width: cli.width,
        mines: cli.mines,
    };
    config.validate()?;
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut wins = 0;
    for game in 1..=cli.games {
        let field = Minefield::random(&config, &mut rng)?;
        let mut agent = Agent::seeded(field.grid(), rng.gen());
        match play(&field, &mut agent)? {
            Outcome::Won { moves, guesses } => {
                wins += 1;
                tracing::info!(
                    game,
                    moves,
                    guesses,
                    all_mines_found = field.won(agent.knowledge().mine_cells()),
                    "won"
                );
            },
            Outcome::Lost {
                cell,
                moves,
                guesses,
            } => {
                tracing::info!(game, ?cell, moves, guesses, "lost");
            },
        }
    }
    #[allow(clippy::cast_precision_loss)]
    let win_rate = wins as f64 / cli.games.max(1) as f64;
    tracing::info!(games = cli.games, wins, win_rate, "done");
    Ok(())
}
