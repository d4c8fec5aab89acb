//! Pawns Board Core - Game engine and strategies
//!
//! This crate provides the core game logic for Pawns Board:
//! - Cards with 5x5 influence grids
//! - Board grid of cells (pawn stacks, placed cards, value modifiers)
//! - Influence propagation, row scoring and the turn state machine
//! - Pluggable rule sets (legacy claim-only, updated upgrade/devalue)
//! - Deck-file loading and game configuration
//! - Read-only move-selection strategies

pub mod error;
pub mod player;
pub mod card;
pub mod cell;
pub mod board;
pub mod rules;
pub mod game;
pub mod deck;
pub mod config;
pub mod shared;
pub mod strategy;

// Re-exports for convenient access
pub use error::{DeckError, ErrorKind, GameError};
pub use player::{Player, PlayerState};
pub use card::{Card, InfluenceGrid, InfluenceKind, INFLUENCE_SIZE};
pub use cell::{Cell, CellContent, MAX_PAWNS};
pub use board::Grid;
pub use rules::{InfluenceEffect, RuleSet, RuleVariant};
pub use game::{Game, GameResult, Move};
pub use deck::{load_deck, parse_deck, shuffled};
pub use config::GameConfig;
pub use shared::SharedGame;
pub use strategy::{play_game, BoardControl, FillFirst, MaximizeRowScore, Strategy, StrategyKind};
