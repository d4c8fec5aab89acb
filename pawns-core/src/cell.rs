//! Board cells

use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::error::GameError;
use crate::player::Player;

/// Maximum pawns in one stack
pub const MAX_PAWNS: u8 = 3;

/// What occupies a cell. Pawns and a card are mutually exclusive.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellContent {
    #[default]
    Empty,
    /// 1..=MAX_PAWNS pawns of a single owner
    Pawns { count: u8, owner: Player },
    /// A placed card; its owner is the card's owner
    Card(Card),
}

/// One board slot: content plus a value modifier applied to any card placed here
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CellRecord")]
pub struct Cell {
    content: CellContent,
    modifier: i32,
}

impl Cell {
    pub fn content(&self) -> &CellContent {
        &self.content
    }

    pub fn modifier(&self) -> i32 {
        self.modifier
    }

    pub fn card(&self) -> Option<&Card> {
        match &self.content {
            CellContent::Card(card) => Some(card),
            _ => None,
        }
    }

    pub fn has_card(&self) -> bool {
        matches!(self.content, CellContent::Card(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.content, CellContent::Empty)
    }

    /// Pawn count (0 when empty or holding a card)
    pub fn pawn_count(&self) -> u8 {
        match self.content {
            CellContent::Pawns { count, .. } => count,
            _ => 0,
        }
    }

    pub fn pawn_owner(&self) -> Option<Player> {
        match self.content {
            CellContent::Pawns { owner, .. } => Some(owner),
            _ => None,
        }
    }

    /// Owner of the card or pawn stack, if any
    pub fn owner(&self) -> Option<Player> {
        match &self.content {
            CellContent::Empty => None,
            CellContent::Pawns { owner, .. } => Some(*owner),
            CellContent::Card(card) => card.owner(),
        }
    }

    /// Add one pawn for `owner` to an empty cell or an own stack below the cap.
    /// Returns false when nothing changed.
    pub(crate) fn add_pawn(&mut self, owner: Player) -> bool {
        match &mut self.content {
            CellContent::Empty => {
                self.content = CellContent::Pawns { count: 1, owner };
                true
            }
            CellContent::Pawns { count, owner: current } if *current == owner && *count < MAX_PAWNS => {
                *count += 1;
                true
            }
            _ => false,
        }
    }

    /// Reassign every pawn in the stack to `owner`, count unchanged
    pub(crate) fn capture(&mut self, owner: Player) {
        if let CellContent::Pawns { owner: current, .. } = &mut self.content {
            *current = owner;
        }
    }

    /// Replace the content with a card; any pawns are consumed
    pub(crate) fn place(&mut self, card: Card) {
        self.content = CellContent::Card(card);
    }

    /// Remove a placed card, leaving a stack of `count` pawns for `owner`
    pub(crate) fn replace_card_with_pawns(&mut self, count: u8, owner: Player) -> Option<Card> {
        let taken = std::mem::replace(
            &mut self.content,
            CellContent::Pawns {
                count: count.clamp(1, MAX_PAWNS),
                owner,
            },
        );
        match taken {
            CellContent::Card(card) => Some(card),
            other => {
                self.content = other;
                None
            }
        }
    }

    pub(crate) fn change_modifier(&mut self, delta: i32) {
        self.modifier = self.modifier.saturating_add(delta);
    }

    pub(crate) fn reset_modifier(&mut self) {
        self.modifier = 0;
    }
}

/// Serialized cell, checked against the stack and ownership rules on the way in
#[derive(Deserialize)]
struct CellRecord {
    content: CellContent,
    modifier: i32,
}

impl TryFrom<CellRecord> for Cell {
    type Error = GameError;

    fn try_from(record: CellRecord) -> Result<Self, Self::Error> {
        match &record.content {
            CellContent::Pawns { count, .. } if !(1..=MAX_PAWNS).contains(count) => {
                return Err(GameError::InvalidState(format!("pawn stack of {count}")));
            }
            CellContent::Card(card) if card.owner().is_none() => {
                return Err(GameError::InvalidState(format!("placed card '{}' has no owner", card.name())));
            }
            _ => {}
        }
        Ok(Self {
            content: record.content,
            modifier: record.modifier,
        })
    }
}
