//! Shared game setup - config overrides, deck loading, seating

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use pawns_core::{deck, Card, Game, GameConfig, Player, PlayerState, RuleVariant};

/// Default cap on moves per game
pub const DEFAULT_MAX_MOVES: usize = 1000;

#[derive(Args, Clone, Debug)]
pub struct GameArgs {
    /// Red's deck file
    #[arg(long, value_name = "FILE")]
    pub red_deck: PathBuf,

    /// Blue's deck file (defaults to a flipped copy of red's)
    #[arg(long, value_name = "FILE")]
    pub blue_deck: Option<PathBuf>,

    /// Game config JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub rows: Option<usize>,

    #[arg(long)]
    pub cols: Option<usize>,

    #[arg(long)]
    pub hand_size: Option<usize>,

    /// Rule variant: legacy or updated
    #[arg(long)]
    pub variant: Option<RuleVariant>,

    /// Stop a game after this many moves
    #[arg(long, default_value_t = DEFAULT_MAX_MOVES)]
    pub max_moves: usize,
}

impl GameArgs {
    /// Config file (or defaults) with command-line overrides applied
    pub fn resolve_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if let Some(hand_size) = self.hand_size {
            config.hand_size = hand_size;
        }
        if let Some(variant) = self.variant {
            config.variant = variant;
        }
        config.validate()?;
        Ok(config)
    }

    /// Red's and blue's card lists. A missing blue deck mirrors red's.
    pub fn load_decks(&self) -> Result<(Vec<Card>, Vec<Card>)> {
        let red = deck::load_deck(&self.red_deck)?;
        let blue = match &self.blue_deck {
            Some(path) => deck::load_deck(path)?,
            None => deck::flipped(&red),
        };
        Ok((red, blue))
    }
}

/// Build and start a game with the given decks
pub fn start_game(config: &GameConfig, red: Vec<Card>, blue: Vec<Card>) -> Result<Game> {
    let mut game = Game::from_config(config)?;
    game.start(
        PlayerState::with_deck(Player::Red, config.hand_size, red)?,
        PlayerState::with_deck(Player::Blue, config.hand_size, blue)?,
    )
    .context("Failed to start game")?;
    Ok(game)
}

/// Per-seat shuffle seeds derived from one game seed
pub fn seat_seeds(seed: u64) -> (u64, u64) {
    let red = seed.wrapping_mul(2);
    (red, red.wrapping_add(1))
}
