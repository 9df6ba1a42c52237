//! Hounds and Hare CLI - Command-line interface
//!
//! Commands:
//! - play: Play a single game, printing the board after every move
//! - match: Play a series of games and report the tally

mod match_cmd;
mod play_cmd;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use hounds_core::{Heuristics, PlayerSpec};

#[derive(Parser)]
#[command(name = "hounds")]
#[command(about = "Hounds and Hare with alpha-beta players")]
struct Cli {
    /// Random seed for reproducible games
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game
    Play(play_cmd::PlayArgs),
    /// Play a series of games between two players
    Match(match_cmd::MatchArgs),
}

/// Player kinds selectable from the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PlayerKind {
    /// Alpha-beta search
    Search,
    /// Uniformly random legal moves
    Random,
    /// First legal move
    First,
    /// Prompt on the terminal
    Human,
}

impl PlayerKind {
    pub fn to_spec(self, depth: u32, rich: bool) -> PlayerSpec {
        match self {
            PlayerKind::Search => PlayerSpec::Search {
                depth,
                heuristics: if rich { Heuristics::rich() } else { Heuristics::default() },
            },
            PlayerKind::Random => PlayerSpec::Random { seed: None },
            PlayerKind::First => PlayerSpec::First,
            PlayerKind::Human => PlayerSpec::Human,
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::Match(args) => match_cmd::run(args, cli.seed),
    }
}
