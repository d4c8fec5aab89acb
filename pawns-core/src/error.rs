//! Error types for the engine and the deck loader

use crate::player::Player;

/// Broad category of a rejected engine call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed call: wrong lifecycle phase, bad indices or coordinates
    IllegalCall,
    /// Well-formed call that breaks a game rule
    IllegalMove,
}

/// Rejection of a game operation. A rejected call never mutates state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("invalid board dimensions {rows}x{cols}: rows must be > 0, cols odd and > 1")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("game has not started")]
    NotStarted,

    #[error("game is already started")]
    AlreadyStarted,

    #[error("game is over")]
    GameOver,

    #[error("game is not over")]
    GameNotOver,

    #[error("({row}, {col}) is outside the board")]
    OutOfBounds { row: usize, col: usize },

    #[error("it is not {0:?}'s turn")]
    NotYourTurn(Player),

    #[error("hand index {index} out of range for hand of {len}")]
    InvalidHandIndex { index: usize, len: usize },

    #[error("cell ({row}, {col}) already holds a card")]
    CellOccupied { row: usize, col: usize },

    #[error("cell ({row}, {col}) has no pawns")]
    NoPawns { row: usize, col: usize },

    #[error("pawns at ({row}, {col}) are not owned by {player:?}")]
    PawnsNotOwned { row: usize, col: usize, player: Player },

    #[error("card costs {cost} but only {available} pawns are available")]
    InsufficientPawns { cost: u8, available: u8 },

    #[error("{player:?} deck holds {size} cards, need at least {needed}")]
    DeckTooSmall { player: Player, size: usize, needed: usize },

    #[error("hand limits differ: {red} vs {blue}")]
    HandSizeMismatch { red: usize, blue: usize },

    #[error("{0:?} player state given for the other seat")]
    WrongSeat(Player),

    #[error("hand limit must be positive")]
    InvalidHandSize,

    #[error("deck cannot be empty")]
    EmptyDeck,

    #[error("card '{0}' already has an owner")]
    OwnerAlreadyBound(String),

    #[error("invalid card '{name}': {reason}")]
    InvalidCard { name: String, reason: String },

    #[error("game lock poisoned")]
    Poisoned,

    #[error("invalid board state: {0}")]
    InvalidState(String),
}

impl GameError {
    /// Classify the rejection
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::NotYourTurn(_)
            | GameError::CellOccupied { .. }
            | GameError::NoPawns { .. }
            | GameError::PawnsNotOwned { .. }
            | GameError::InsufficientPawns { .. }
            | GameError::GameOver => ErrorKind::IllegalMove,
            _ => ErrorKind::IllegalCall,
        }
    }
}

/// Deck-file malformation, reported with the 1-based line number
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DeckError {
    #[error("line {line}: expected '<name> <cost> <value>', got '{header}'")]
    BadHeader { line: usize, header: String },

    #[error("line {line}: {field} '{text}' is not a number")]
    NotANumber { line: usize, field: &'static str, text: String },

    #[error("line {line}: cost {cost} outside 1..=3")]
    CostOutOfRange { line: usize, cost: i64 },

    #[error("line {line}: value {value} must be positive")]
    ValueOutOfRange { line: usize, value: i64 },

    #[error("card '{card}': grid ends after {rows} rows")]
    IncompleteGrid { card: String, rows: usize },

    #[error("line {line}: grid row must have exactly 5 symbols, got {len}")]
    BadRowLength { line: usize, len: usize },

    #[error("card '{card}': center cell must be 'C'")]
    MissingCenter { card: String },

    #[error("line {line}: 'C' is only allowed at the center")]
    MisplacedCenter { line: usize },

    #[error("line {line}: unknown grid symbol '{symbol}'")]
    UnknownSymbol { line: usize, symbol: char },

    #[error(transparent)]
    Card(#[from] GameError),
}
