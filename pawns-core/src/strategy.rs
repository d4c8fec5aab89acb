//! Move-selection strategies
//!
//! Strategies are read-only: they inspect a `&Game` and return a `Move`.
//! BoardControl simulates candidates on a cloned grid, never the live one.
//! No legal move is reported as `Move::Pass`, never as an error.

use serde::{Deserialize, Serialize};

use crate::game::{Game, Move};
use crate::player::Player;

/// A move-selection policy
pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn choose_move(&self, game: &Game, player: Player) -> Move;
}

// ============================================================================
// FILL FIRST
// ============================================================================

/// First legal placement in hand, row, col order
#[derive(Clone, Copy, Debug, Default)]
pub struct FillFirst;

impl Strategy for FillFirst {
    fn name(&self) -> &'static str {
        "fill-first"
    }

    fn choose_move(&self, game: &Game, player: Player) -> Move {
        game.legal_moves(player).first().copied().unwrap_or(Move::Pass)
    }
}

// ============================================================================
// MAXIMIZE ROW SCORE
// ============================================================================

/// Win the topmost row the player is not already winning
#[derive(Clone, Copy, Debug, Default)]
pub struct MaximizeRowScore;

impl Strategy for MaximizeRowScore {
    fn name(&self) -> &'static str {
        "maximize-row-score"
    }

    fn choose_move(&self, game: &Game, player: Player) -> Move {
        let Ok(state) = game.player(player) else {
            return Move::Pass;
        };
        if game.is_over() {
            return Move::Pass;
        }
        let grid = game.grid();

        for row in 0..grid.rows() {
            let (Ok(mine), Ok(theirs)) = (game.row_score(player, row), game.row_score(player.opponent(), row)) else {
                continue;
            };
            if mine > theirs {
                continue;
            }
            for (hand_index, card) in state.hand().iter().enumerate() {
                if mine.saturating_add(u64::from(card.value())) <= theirs {
                    continue;
                }
                if let Some(col) = (0..grid.cols()).find(|&col| grid.can_place(card, player, row, col)) {
                    return Move::Place { hand_index, row, col };
                }
            }
        }
        Move::Pass
    }
}

// ============================================================================
// BOARD CONTROL
// ============================================================================

/// Maximize the number of cells owned after the placement.
/// Ties go to the smaller row, then column, then hand index.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoardControl;

impl BoardControl {
    /// Cells the player would own after `mv`, simulated on a copy of the grid
    pub fn owned_after(game: &Game, player: Player, mv: Move) -> Option<usize> {
        let Move::Place { hand_index, row, col } = mv else {
            return Some(game.owned_cells(player));
        };
        let card = game.hand(player).ok()?.get(hand_index)?;
        let mut scratch = game.grid().clone();
        scratch.check_placement(card, player, row, col).ok()?;
        scratch.place_and_influence(card.clone(), player, row, col, game.rules());
        Some(scratch.owned_cells(player))
    }
}

fn tie_key(mv: Move) -> (usize, usize, usize) {
    match mv {
        Move::Place { hand_index, row, col } => (row, col, hand_index),
        Move::Pass => (usize::MAX, usize::MAX, usize::MAX),
    }
}

impl Strategy for BoardControl {
    fn name(&self) -> &'static str {
        "board-control"
    }

    fn choose_move(&self, game: &Game, player: Player) -> Move {
        game.legal_moves(player)
            .into_iter()
            .filter_map(|mv| Self::owned_after(game, player, mv).map(|owned| (owned, mv)))
            .max_by(|(a_owned, a), (b_owned, b)| {
                a_owned.cmp(b_owned).then_with(|| tie_key(*b).cmp(&tie_key(*a)))
            })
            .map_or(Move::Pass, |(_, mv)| mv)
    }
}

// ============================================================================
// SELECTION BY NAME
// ============================================================================

/// Named strategies, for configuration and the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    FillFirst,
    MaximizeRowScore,
    BoardControl,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::FillFirst,
        StrategyKind::MaximizeRowScore,
        StrategyKind::BoardControl,
    ];

    pub fn build(self) -> Box<dyn Strategy> {
        match self {
            StrategyKind::FillFirst => Box::new(FillFirst),
            StrategyKind::MaximizeRowScore => Box::new(MaximizeRowScore),
            StrategyKind::BoardControl => Box::new(BoardControl),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::FillFirst => "fill-first",
            StrategyKind::MaximizeRowScore => "maximize-row-score",
            StrategyKind::BoardControl => "board-control",
        }
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown strategy '{s}'"))
    }
}

// ============================================================================
// GAME LOOP
// ============================================================================

/// Alternate the two strategies until game over or `max_moves` moves.
/// A strategy move the engine rejects is replaced by a pass.
/// Returns the number of moves applied.
pub fn play_game(game: &mut Game, red: &dyn Strategy, blue: &dyn Strategy, max_moves: usize) -> usize {
    let mut applied = 0;
    while game.is_started() && !game.is_over() && applied < max_moves {
        let player = game.current_turn();
        let strategy = match player {
            Player::Red => red,
            Player::Blue => blue,
        };
        let mv = strategy.choose_move(game, player);
        if let Err(err) = game.apply_move(player, mv) {
            tracing::warn!(strategy = strategy.name(), ?mv, %err, "rejected move, passing");
            if game.pass_turn(player).is_err() {
                break;
            }
        }
        applied += 1;
    }
    applied
}

// ============================================================================
// TESTS
// ============================================================================
