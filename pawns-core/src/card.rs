//! Card definitions and influence grids

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::player::Player;

/// Side length of an influence grid
pub const INFLUENCE_SIZE: usize = 5;

/// Grid index of the placement cell
pub const INFLUENCE_CENTER: usize = 2;

/// Allowed card costs (pawns consumed)
pub const MIN_COST: u8 = 1;
pub const MAX_COST: u8 = 3;

/// Effect a card has on one cell of its neighborhood
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InfluenceKind {
    None,
    Claim,
    Upgrade,
    Devalue,
}

impl InfluenceKind {
    /// Deck-file symbol. The center marker 'C' is handled by the loader.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'X' => Some(InfluenceKind::None),
            'I' => Some(InfluenceKind::Claim),
            'U' => Some(InfluenceKind::Upgrade),
            'D' => Some(InfluenceKind::Devalue),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            InfluenceKind::None => 'X',
            InfluenceKind::Claim => 'I',
            InfluenceKind::Upgrade => 'U',
            InfluenceKind::Devalue => 'D',
        }
    }
}

/// 5x5 influence pattern centered on the placement cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfluenceGrid([[InfluenceKind; INFLUENCE_SIZE]; INFLUENCE_SIZE]);

impl InfluenceGrid {
    pub fn new(cells: [[InfluenceKind; INFLUENCE_SIZE]; INFLUENCE_SIZE]) -> Self {
        Self(cells)
    }

    /// Grid whose only influence is the center claim
    pub fn center_only() -> Self {
        let mut cells = [[InfluenceKind::None; INFLUENCE_SIZE]; INFLUENCE_SIZE];
        cells[INFLUENCE_CENTER][INFLUENCE_CENTER] = InfluenceKind::Claim;
        Self(cells)
    }

    /// Center-only grid plus the given (grid row, grid col, kind) entries.
    /// None if an entry falls outside the 5x5 grid.
    pub fn with(entries: &[(usize, usize, InfluenceKind)]) -> Option<Self> {
        let mut grid = Self::center_only();
        for &(i, j, kind) in entries {
            *grid.0.get_mut(i)?.get_mut(j)? = kind;
        }
        Some(grid)
    }

    pub fn get(&self, i: usize, j: usize) -> InfluenceKind {
        self.0[i][j]
    }

    pub fn center(&self) -> InfluenceKind {
        self.0[INFLUENCE_CENTER][INFLUENCE_CENTER]
    }

    /// Iterate (row offset, col offset, kind) relative to the placement cell
    pub fn offsets(&self) -> impl Iterator<Item = (isize, isize, InfluenceKind)> + '_ {
        self.0.iter().enumerate().flat_map(|(i, row)| {
            row.iter().enumerate().map(move |(j, &kind)| {
                (
                    i as isize - INFLUENCE_CENTER as isize,
                    j as isize - INFLUENCE_CENTER as isize,
                    kind,
                )
            })
        })
    }

    /// Rotate 180 degrees
    pub fn flipped(&self) -> Self {
        let mut cells = [[InfluenceKind::None; INFLUENCE_SIZE]; INFLUENCE_SIZE];
        for (i, row) in self.0.iter().enumerate() {
            for (j, &kind) in row.iter().enumerate() {
                cells[INFLUENCE_SIZE - 1 - i][INFLUENCE_SIZE - 1 - j] = kind;
            }
        }
        Self(cells)
    }
}

/// Immutable card definition. The owner is bound once, at deck-bind time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CardRecord")]
pub struct Card {
    name: String,
    cost: u8,
    value: u32,
    influence: InfluenceGrid,
    owner: Option<Player>,
}

impl Card {
    pub fn new(
        name: impl Into<String>,
        cost: u8,
        value: u32,
        influence: InfluenceGrid,
    ) -> Result<Self, GameError> {
        let name = name.into();
        let invalid = |reason: &str| GameError::InvalidCard {
            name: name.clone(),
            reason: reason.to_string(),
        };
        if name.trim().is_empty() {
            return Err(invalid("name is empty"));
        }
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(invalid("cost must be between 1 and 3"));
        }
        if value == 0 {
            return Err(invalid("value must be positive"));
        }
        if influence.center() != InfluenceKind::Claim {
            return Err(invalid("center of the influence grid must claim"));
        }
        Ok(Self {
            name,
            cost,
            value,
            influence,
            owner: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cost(&self) -> u8 {
        self.cost
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn influence(&self) -> &InfluenceGrid {
        &self.influence
    }

    pub fn owner(&self) -> Option<Player> {
        self.owner
    }

    pub fn bind_owner(&mut self, owner: Player) -> Result<(), GameError> {
        if self.owner.is_some() {
            return Err(GameError::OwnerAlreadyBound(self.name.clone()));
        }
        self.owner = Some(owner);
        Ok(())
    }

    /// Unowned copy with the influence grid rotated 180 degrees,
    /// for the player seated on the opposite side.
    pub fn flipped(&self) -> Self {
        Self {
            name: self.name.clone(),
            cost: self.cost,
            value: self.value,
            influence: self.influence.flipped(),
            owner: None,
        }
    }
}

/// Serialized card, checked by `Card::new` on the way in
#[derive(Deserialize)]
struct CardRecord {
    name: String,
    cost: u8,
    value: u32,
    influence: InfluenceGrid,
    owner: Option<Player>,
}

impl TryFrom<CardRecord> for Card {
    type Error = GameError;

    fn try_from(record: CardRecord) -> Result<Self, Self::Error> {
        let mut card = Card::new(record.name, record.cost, record.value, record.influence)?;
        card.owner = record.owner;
        Ok(card)
    }
}
