//! Board grid: geometry, influence propagation and row scoring

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::card::{Card, InfluenceGrid, InfluenceKind};
use crate::cell::{Cell, CellContent};
use crate::error::GameError;
use crate::player::Player;
use crate::rules::{EffectOutcome, RuleSet};

/// Rows x cols grid of cells (row-major). Cheap to clone for simulation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridRecord")]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Empty grid. Columns must be odd and > 1 so the board has a center column.
    pub fn new(rows: usize, cols: usize) -> Result<Self, GameError> {
        if rows == 0 || cols <= 1 || cols % 2 == 0 {
            return Err(GameError::InvalidDimensions { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            cells: vec![Cell::default(); rows * cols],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    pub fn cell(&self, row: usize, col: usize) -> Result<&Cell, GameError> {
        if row >= self.rows || col >= self.cols {
            return Err(GameError::OutOfBounds { row, col });
        }
        Ok(&self.cells[row * self.cols + col])
    }

    fn cell_mut(&mut self, row: usize, col: usize) -> &mut Cell {
        &mut self.cells[row * self.cols + col]
    }

    /// Iterate ((row, col), cell) in row-major order
    pub fn cells(&self) -> impl Iterator<Item = ((usize, usize), &Cell)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| ((i / cols, i % cols), cell))
    }

    /// One pawn for red down column 0, one for blue down the last column
    pub(crate) fn seed_edges(&mut self) {
        let last = self.cols - 1;
        for row in 0..self.rows {
            self.cell_mut(row, 0).add_pawn(Player::Red);
            self.cell_mut(row, last).add_pawn(Player::Blue);
        }
    }

    /// Check every placement rule for `card` at (row, col) without mutating
    pub fn check_placement(&self, card: &Card, player: Player, row: usize, col: usize) -> Result<(), GameError> {
        let cell = self.cell(row, col)?;
        match cell.content() {
            CellContent::Card(_) => Err(GameError::CellOccupied { row, col }),
            CellContent::Empty => Err(GameError::NoPawns { row, col }),
            CellContent::Pawns { owner, .. } if *owner != player => {
                Err(GameError::PawnsNotOwned { row, col, player })
            }
            CellContent::Pawns { count, .. } if *count < card.cost() => Err(GameError::InsufficientPawns {
                cost: card.cost(),
                available: *count,
            }),
            CellContent::Pawns { .. } => Ok(()),
        }
    }

    pub fn can_place(&self, card: &Card, player: Player, row: usize, col: usize) -> bool {
        self.check_placement(card, player, row, col).is_ok()
    }

    /// Put the card on the cell and apply its influence. The caller has
    /// already validated the placement with `check_placement`.
    pub fn place_and_influence(&mut self, card: Card, owner: Player, row: usize, col: usize, rules: &RuleSet) {
        let influence = *card.influence();
        self.cell_mut(row, col).place(card);
        self.apply_influence(&influence, owner, row, col, rules);
    }

    fn apply_influence(
        &mut self,
        influence: &InfluenceGrid,
        owner: Player,
        row: usize,
        col: usize,
        rules: &RuleSet,
    ) {
        for (dr, dc, kind) in influence.offsets() {
            if kind == InfluenceKind::None {
                continue;
            }
            let Some(effect) = rules.effect(kind) else {
                continue;
            };
            let (target_row, target_col) = (row as isize + dr, col as isize + dc);
            if !self.in_bounds(target_row, target_col) {
                continue;
            }
            let (target_row, target_col) = (target_row as usize, target_col as usize);
            let outcome = effect.apply(self.cell_mut(target_row, target_col), owner);
            match outcome {
                EffectOutcome::Captured => {
                    tracing::debug!(?owner, target_row, target_col, "captured pawns");
                }
                EffectOutcome::Destroyed(card) => {
                    tracing::debug!(card = card.name(), target_row, target_col, "card destroyed");
                }
                other => {
                    tracing::trace!(?kind, ?other, target_row, target_col, "influence applied");
                }
            }
        }
    }

    /// Sum of the player's card scores in a row under the given rules
    pub fn row_score(&self, player: Player, row: usize, rules: &RuleSet) -> Result<u64, GameError> {
        if row >= self.rows {
            return Err(GameError::OutOfBounds { row, col: 0 });
        }
        let start = row * self.cols;
        Ok(self.cells[start..start + self.cols]
            .iter()
            .filter_map(|cell| cell.card().map(|card| (card, cell.modifier())))
            .filter(|(card, _)| card.owner() == Some(player))
            .map(|(card, modifier)| rules.card_score(card, modifier))
            .fold(0, u64::saturating_add))
    }

    /// Row-win scoring: only the strictly higher scorer banks a row
    pub fn total_score(&self, player: Player, rules: &RuleSet) -> u64 {
        (0..self.rows)
            .filter_map(|row| {
                let mine = self.row_score(player, row, rules).ok()?;
                let theirs = self.row_score(player.opponent(), row, rules).ok()?;
                (mine > theirs).then_some(mine)
            })
            .fold(0, u64::saturating_add)
    }

    /// Cells holding the player's card or the player's pawns
    pub fn owned_cells(&self, player: Player) -> usize {
        self.cells.iter().filter(|c| c.owner() == Some(player)).count()
    }
}

/// Serialized grid, rebuilt through `Grid::new` on the way in
#[derive(Deserialize)]
struct GridRecord {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl TryFrom<GridRecord> for Grid {
    type Error = GameError;

    fn try_from(record: GridRecord) -> Result<Self, Self::Error> {
        let mut grid = Grid::new(record.rows, record.cols)?;
        if record.cells.len() != grid.cells.len() {
            return Err(GameError::InvalidState(format!(
                "{} cells for a {}x{} grid",
                record.cells.len(),
                record.rows,
                record.cols
            )));
        }
        grid.cells = record.cells;
        Ok(grid)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            let line: Vec<String> = self.cells[row * self.cols..(row + 1) * self.cols]
                .iter()
                .map(render_cell)
                .collect();
            writeln!(f, "{}", line.join("  "))?;
        }
        Ok(())
    }
}

fn render_cell(cell: &Cell) -> String {
    match cell.content() {
        CellContent::Empty => "__".to_string(),
        CellContent::Pawns { count, owner } => format!("{}{}", owner.symbol(), count),
        CellContent::Card(card) => {
            let tag = card.owner().map_or('?', Player::symbol);
            match cell.modifier() {
                0 => format!("{}{}", tag, card.value()),
                m => format!("{}{}({:+})", tag, card.value(), m),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(owner: Player, cost: u8, value: u32, grid: InfluenceGrid) -> Card {
        let mut card = Card::new("t", cost, value, grid).unwrap();
        card.bind_owner(owner).unwrap();
        card
    }

    fn seeded(rows: usize, cols: usize) -> Grid {
        let mut grid = Grid::new(rows, cols).unwrap();
        grid.seed_edges();
        grid
    }

    #[test]
    fn test_dimensions() {
        assert!(Grid::new(3, 5).is_ok());
        assert!(Grid::new(0, 5).is_err());
        assert!(Grid::new(3, 1).is_err());
        assert!(Grid::new(3, 4).is_err());
    }

    #[test]
    fn test_seed_edges() {
        let grid = seeded(3, 5);
        for row in 0..3 {
            assert_eq!(grid.cell(row, 0).unwrap().pawn_owner(), Some(Player::Red));
            assert_eq!(grid.cell(row, 4).unwrap().pawn_owner(), Some(Player::Blue));
            assert!(grid.cell(row, 2).unwrap().is_empty());
        }
        assert_eq!(grid.owned_cells(Player::Red), 3);
    }

    #[test]
    fn test_check_placement() {
        let grid = seeded(3, 5);
        let cheap = card(Player::Red, 1, 1, InfluenceGrid::center_only());
        let dear = card(Player::Red, 2, 1, InfluenceGrid::center_only());
        assert!(grid.can_place(&cheap, Player::Red, 0, 0));
        assert_eq!(
            grid.check_placement(&dear, Player::Red, 0, 0),
            Err(GameError::InsufficientPawns { cost: 2, available: 1 })
        );
        assert_eq!(grid.check_placement(&cheap, Player::Red, 0, 2), Err(GameError::NoPawns { row: 0, col: 2 }));
        assert!(matches!(
            grid.check_placement(&cheap, Player::Red, 0, 4),
            Err(GameError::PawnsNotOwned { .. })
        ));
        assert!(matches!(
            grid.check_placement(&cheap, Player::Red, 3, 0),
            Err(GameError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_center_only_card_touches_nothing_else() {
        let mut grid = seeded(3, 5);
        let before = grid.clone();
        let rules = RuleSet::updated();
        grid.place_and_influence(card(Player::Red, 1, 1, InfluenceGrid::center_only()), Player::Red, 0, 0, &rules);
        assert_eq!(grid.row_score(Player::Red, 0, &rules), Ok(1));
        for ((row, col), cell) in grid.cells() {
            if (row, col) != (0, 0) {
                assert_eq!(cell, before.cell(row, col).unwrap());
            }
        }
    }

    #[test]
    fn test_claim_cross_skips_out_of_bounds() {
        let mut grid = seeded(3, 5);
        let cross = InfluenceGrid::with(&[
            (1, 2, InfluenceKind::Claim),
            (3, 2, InfluenceKind::Claim),
            (2, 1, InfluenceKind::Claim),
            (2, 3, InfluenceKind::Claim),
        ]).unwrap();
        let rules = RuleSet::updated();
        grid.place_and_influence(card(Player::Red, 1, 1, cross), Player::Red, 0, 0, &rules);
        assert_eq!(grid.cell(1, 0).unwrap().pawn_count(), 2);
        assert_eq!(grid.cell(0, 1).unwrap().pawn_owner(), Some(Player::Red));
        assert_eq!(grid.owned_cells(Player::Red), 4);
    }

    #[test]
    fn test_total_score_contested_rows() {
        let mut grid = seeded(2, 3);
        let rules = RuleSet::legacy();
        let center = InfluenceGrid::center_only();
        grid.place_and_influence(card(Player::Red, 1, 2, center), Player::Red, 0, 0, &rules);
        grid.place_and_influence(card(Player::Blue, 1, 2, center), Player::Blue, 0, 2, &rules);
        grid.place_and_influence(card(Player::Blue, 1, 3, center), Player::Blue, 1, 2, &rules);
        assert_eq!(grid.total_score(Player::Red, &rules), 0);
        assert_eq!(grid.total_score(Player::Blue, &rules), 3);
    }

    #[test]
    fn test_row_score_holds_max_values() {
        let mut grid = seeded(1, 3);
        let rules = RuleSet::updated();
        let upgrade_left = InfluenceGrid::with(&[(2, 1, InfluenceKind::Upgrade)]).unwrap();
        let giant = card(Player::Red, 1, u32::MAX, InfluenceGrid::center_only());
        grid.place_and_influence(giant, Player::Red, 0, 0, &rules);
        grid.place_and_influence(card(Player::Red, 1, u32::MAX, upgrade_left), Player::Red, 0, 1, &rules);

        let expected = 2 * u64::from(u32::MAX) + 1;
        assert_eq!(grid.row_score(Player::Red, 0, &rules), Ok(expected));
        assert_eq!(grid.total_score(Player::Red, &rules), expected);
    }

    #[test]
    fn test_deserialize_round_trip() {
        let mut grid = seeded(3, 5);
        let rules = RuleSet::updated();
        grid.place_and_influence(card(Player::Red, 1, 2, InfluenceGrid::center_only()), Player::Red, 1, 0, &rules);
        let json = serde_json::to_string(&grid).unwrap();
        let restored: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, grid);
        assert_eq!(restored.row_score(Player::Red, 1, &rules), Ok(2));
    }

    #[test]
    fn test_deserialize_rejects_bad_shape() {
        let short = r#"{"rows":3,"cols":5,"cells":[{"content":{"Pawns":{"count":1,"owner":"Red"}},"modifier":0}]}"#;
        assert!(serde_json::from_str::<Grid>(short).is_err());

        let even = r#"{"rows":1,"cols":2,"cells":[{"content":"Empty","modifier":0},{"content":"Empty","modifier":0}]}"#;
        assert!(serde_json::from_str::<Grid>(even).is_err());

        let overfull = r#"{"rows":1,"cols":3,"cells":[{"content":{"Pawns":{"count":9,"owner":"Red"}},"modifier":0},{"content":"Empty","modifier":0},{"content":"Empty","modifier":0}]}"#;
        assert!(serde_json::from_str::<Grid>(overfull).is_err());
    }

    #[test]
    fn test_render() {
        let mut grid = seeded(1, 3);
        let rules = RuleSet::updated();
        let upgrade_right = InfluenceGrid::with(&[(2, 3, InfluenceKind::Upgrade)]).unwrap();
        grid.place_and_influence(card(Player::Red, 1, 2, upgrade_right), Player::Red, 0, 0, &rules);
        assert_eq!(grid.to_string(), "R2  __  B1\n");
        grid.cell_mut(0, 0).change_modifier(1);
        assert_eq!(grid.to_string(), "R2(+1)  __  B1\n");
    }
}
