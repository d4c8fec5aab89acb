//! SharedGame - serialized access for drivers running players on threads
//!
//! Placement and passing read then write several fields, so every mutation
//! goes through the write lock. Readers (views, strategies) take the read
//! lock and never observe a half-applied move.

use std::sync::{Arc, RwLock};

use crate::error::GameError;
use crate::game::{Game, Move};
use crate::player::Player;
use crate::strategy::Strategy;

#[derive(Clone, Debug)]
pub struct SharedGame {
    inner: Arc<RwLock<Game>>,
}

impl SharedGame {
    pub fn new(game: Game) -> Self {
        Self {
            inner: Arc::new(RwLock::new(game)),
        }
    }

    /// Run a read-only query against the current state
    pub fn read<T>(&self, f: impl FnOnce(&Game) -> T) -> Result<T, GameError> {
        let guard = self.inner.read().map_err(|_| GameError::Poisoned)?;
        Ok(f(&guard))
    }

    pub fn place_card(&self, player: Player, hand_index: usize, row: usize, col: usize) -> Result<(), GameError> {
        self.apply_move(player, Move::Place { hand_index, row, col })
    }

    pub fn pass_turn(&self, player: Player) -> Result<(), GameError> {
        self.apply_move(player, Move::Pass)
    }

    pub fn apply_move(&self, player: Player, mv: Move) -> Result<(), GameError> {
        let mut guard = self.inner.write().map_err(|_| GameError::Poisoned)?;
        guard.apply_move(player, mv)
    }

    /// Choose and apply a move atomically: no other writer can interleave
    /// between the strategy's read and the resulting mutation.
    pub fn play_strategy(&self, player: Player, strategy: &dyn Strategy) -> Result<Move, GameError> {
        let mut guard = self.inner.write().map_err(|_| GameError::Poisoned)?;
        let mv = strategy.choose_move(&guard, player);
        guard.apply_move(player, mv)?;
        Ok(mv)
    }

    /// Snapshot of the current state
    pub fn snapshot(&self) -> Result<Game, GameError> {
        self.read(Game::clone)
    }
}
