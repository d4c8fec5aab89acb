//! Game state: placement, passing, turn order and termination

use serde::{Deserialize, Serialize};

use crate::board::Grid;
use crate::card::Card;
use crate::cell::Cell;
use crate::config::GameConfig;
use crate::error::GameError;
use crate::player::{Player, PlayerState};
use crate::rules::RuleSet;

// ============================================================================
// CORE TYPES
// ============================================================================

/// A move chosen by a player or strategy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Pass,
    Place { hand_index: usize, row: usize, col: usize },
}

impl Move {
    pub fn is_pass(&self) -> bool {
        matches!(self, Move::Pass)
    }
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    Winner(Player),
    Tie,
}

// ============================================================================
// GAME STATE
// ============================================================================

/// The engine. Validates every call fully before mutating anything.
#[derive(Clone, Debug)]
pub struct Game {
    grid: Grid,
    rules: RuleSet,

    /// Indexed by `Player::index()`; None until started
    players: Option<[PlayerState; 2]>,

    turn: Player,
    last_was_pass: bool,
    over: bool,

    history: Vec<(Player, Move)>,
}

impl Game {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    pub fn new(rows: usize, cols: usize, rules: RuleSet) -> Result<Self, GameError> {
        Ok(Self {
            grid: Grid::new(rows, cols)?,
            rules,
            players: None,
            turn: Player::Red,
            last_was_pass: false,
            over: false,
            history: Vec::new(),
        })
    }

    pub fn from_config(config: &GameConfig) -> Result<Self, GameError> {
        Self::new(config.rows, config.cols, RuleSet::for_variant(config.variant))
    }

    /// Deal opening hands, seed the edge columns and hand red the first turn
    pub fn start(&mut self, mut red: PlayerState, mut blue: PlayerState) -> Result<(), GameError> {
        if self.players.is_some() {
            return Err(GameError::AlreadyStarted);
        }
        if red.color() != Player::Red {
            return Err(GameError::WrongSeat(red.color()));
        }
        if blue.color() != Player::Blue {
            return Err(GameError::WrongSeat(blue.color()));
        }
        let needed = self.grid.rows() * self.grid.cols();
        for state in [&red, &blue] {
            if state.deck_len() < needed {
                return Err(GameError::DeckTooSmall {
                    player: state.color(),
                    size: state.deck_len(),
                    needed,
                });
            }
        }
        if red.hand_limit() != blue.hand_limit() {
            return Err(GameError::HandSizeMismatch {
                red: red.hand_limit(),
                blue: blue.hand_limit(),
            });
        }

        red.refill();
        blue.refill();
        self.grid.seed_edges();
        self.players = Some([red, blue]);
        self.turn = Player::Red;
        tracing::debug!(
            rows = self.grid.rows(),
            cols = self.grid.cols(),
            rules = %self.rules.name,
            "game started"
        );
        Ok(())
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn cell(&self, row: usize, col: usize) -> Result<&Cell, GameError> {
        self.grid.cell(row, col)
    }

    pub fn is_started(&self) -> bool {
        self.players.is_some()
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn current_turn(&self) -> Player {
        self.turn
    }

    pub fn history(&self) -> &[(Player, Move)] {
        &self.history
    }

    pub fn player(&self, color: Player) -> Result<&PlayerState, GameError> {
        self.players
            .as_ref()
            .map(|p| &p[color.index()])
            .ok_or(GameError::NotStarted)
    }

    pub fn hand(&self, color: Player) -> Result<&[Card], GameError> {
        self.player(color).map(PlayerState::hand)
    }

    pub fn row_score(&self, player: Player, row: usize) -> Result<u64, GameError> {
        self.require_started()?;
        self.grid.row_score(player, row, &self.rules)
    }

    pub fn total_score(&self, player: Player) -> Result<u64, GameError> {
        self.require_started()?;
        Ok(self.grid.total_score(player, &self.rules))
    }

    pub fn owned_cells(&self, player: Player) -> usize {
        self.grid.owned_cells(player)
    }

    /// Winner after game over; Ok(None) on equal totals
    pub fn winner(&self) -> Result<Option<Player>, GameError> {
        self.require_started()?;
        if !self.over {
            return Err(GameError::GameNotOver);
        }
        let red = self.grid.total_score(Player::Red, &self.rules);
        let blue = self.grid.total_score(Player::Blue, &self.rules);
        Ok(match red.cmp(&blue) {
            std::cmp::Ordering::Greater => Some(Player::Red),
            std::cmp::Ordering::Less => Some(Player::Blue),
            std::cmp::Ordering::Equal => None,
        })
    }

    pub fn result(&self) -> GameResult {
        match self.winner() {
            Ok(Some(player)) => GameResult::Winner(player),
            Ok(None) => GameResult::Tie,
            Err(_) => GameResult::Ongoing,
        }
    }

    /// Every placement the player's hand allows on the current grid,
    /// in hand, row, col order. Turn order is not considered.
    pub fn legal_moves(&self, player: Player) -> Vec<Move> {
        let Ok(state) = self.player(player) else {
            return Vec::new();
        };
        if self.over {
            return Vec::new();
        }
        let mut moves = Vec::new();
        for (hand_index, card) in state.hand().iter().enumerate() {
            for row in 0..self.grid.rows() {
                for col in 0..self.grid.cols() {
                    if self.grid.can_place(card, player, row, col) {
                        moves.push(Move::Place { hand_index, row, col });
                    }
                }
            }
        }
        moves
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Place a card from the player's hand onto (row, col)
    pub fn place_card(&mut self, player: Player, hand_index: usize, row: usize, col: usize) -> Result<(), GameError> {
        self.require_started()?;
        self.grid.cell(row, col)?;
        self.require_turn(player)?;
        let card = self.player(player)?.card_at(hand_index)?;
        self.grid.check_placement(card, player, row, col)?;

        let players = self.players.as_mut().ok_or(GameError::NotStarted)?;
        let state = &mut players[player.index()];
        let card = state.take_from_hand(hand_index);
        tracing::debug!(?player, card = card.name(), row, col, "card placed");
        self.grid.place_and_influence(card, player, row, col, &self.rules);
        state.refill();

        self.last_was_pass = false;
        self.turn = player.opponent();
        self.history.push((player, Move::Place { hand_index, row, col }));
        Ok(())
    }

    /// Pass. Two consecutive passes end the game.
    pub fn pass_turn(&mut self, player: Player) -> Result<(), GameError> {
        self.require_started()?;
        self.require_turn(player)?;

        self.turn = player.opponent();
        self.history.push((player, Move::Pass));
        if self.last_was_pass {
            self.over = true;
            tracing::debug!(?player, "second consecutive pass, game over");
        } else {
            self.last_was_pass = true;
            tracing::debug!(?player, "passed");
        }
        Ok(())
    }

    pub fn apply_move(&mut self, player: Player, mv: Move) -> Result<(), GameError> {
        match mv {
            Move::Pass => self.pass_turn(player),
            Move::Place { hand_index, row, col } => self.place_card(player, hand_index, row, col),
        }
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn require_started(&self) -> Result<(), GameError> {
        if self.players.is_none() {
            return Err(GameError::NotStarted);
        }
        Ok(())
    }

    fn require_turn(&self, player: Player) -> Result<(), GameError> {
        if self.over {
            return Err(GameError::GameOver);
        }
        if self.turn != player {
            return Err(GameError::NotYourTurn(player));
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
