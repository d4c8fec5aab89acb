//! PAWNS CLI - Command-line interface
//!
//! Commands:
//! - play: Play a single game between two strategies
//! - match: Play a series of games and compare two strategies
//! - check-deck: Validate a deck file

mod check_deck;
mod match_cmd;
mod play_cmd;
mod setup;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pawns")]
#[command(about = "Pawns Board game engine and strategy runner")]
struct Cli {
    /// Seed for deck shuffles
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game between two strategies
    Play(play_cmd::PlayArgs),
    /// Play a series of games alternating colors
    Match(match_cmd::MatchArgs),
    /// Parse a deck file and list its cards
    CheckDeck(check_deck::CheckDeckArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::Match(args) => match_cmd::run(args, cli.seed),
        Commands::CheckDeck(args) => check_deck::run(args),
    }
}
