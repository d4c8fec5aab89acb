//! Deck files
//!
//! One record per card: a header line `<name> <cost> <value>` followed by
//! five rows of five symbols. `X` no influence, `I` claim, `U` upgrade,
//! `D` devalue, and `C` marks the placement cell (required at the center,
//! forbidden elsewhere). Blank lines between records are ignored.

use std::path::Path;

use anyhow::Context;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::card::{Card, InfluenceGrid, InfluenceKind, INFLUENCE_CENTER, INFLUENCE_SIZE, MAX_COST, MIN_COST};
use crate::error::DeckError;

const CENTER_SYMBOL: char = 'C';

/// Parse every card in a deck file's contents
pub fn parse_deck(content: &str) -> Result<Vec<Card>, DeckError> {
    let mut lines = content.lines().enumerate().map(|(i, line)| (i + 1, line));
    let mut cards = Vec::new();

    while let Some((line_no, line)) = lines.next() {
        let header = line.trim();
        if header.is_empty() {
            continue;
        }
        let (name, cost, value) = parse_header(line_no, header)?;

        let mut cells = [[InfluenceKind::None; INFLUENCE_SIZE]; INFLUENCE_SIZE];
        for (row, cells_row) in cells.iter_mut().enumerate() {
            let (line_no, line) = lines.next().ok_or_else(|| DeckError::IncompleteGrid {
                card: name.to_string(),
                rows: row,
            })?;
            *cells_row = parse_grid_row(line_no, line, row, name)?;
        }

        cards.push(Card::new(name, cost, value, InfluenceGrid::new(cells))?);
    }

    Ok(cards)
}

/// Read and parse a deck file
pub fn load_deck(path: &Path) -> anyhow::Result<Vec<Card>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read deck: {}", path.display()))?;
    let cards = parse_deck(&content)
        .with_context(|| format!("Malformed deck: {}", path.display()))?;
    tracing::debug!(path = %path.display(), cards = cards.len(), "deck loaded");
    Ok(cards)
}

/// Seeded permutation of a deck
pub fn shuffled(mut cards: Vec<Card>, seed: u64) -> Vec<Card> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    cards.shuffle(&mut rng);
    cards
}

/// Copies of the cards with influence rotated for the opposite seat
pub fn flipped(cards: &[Card]) -> Vec<Card> {
    cards.iter().map(Card::flipped).collect()
}

fn parse_header(line: usize, header: &str) -> Result<(&str, u8, u32), DeckError> {
    let parts: Vec<&str> = header.split_whitespace().collect();
    let &[name, cost, value] = parts.as_slice() else {
        return Err(DeckError::BadHeader {
            line,
            header: header.to_string(),
        });
    };
    let cost = parse_number(line, "cost", cost)?;
    if !(i64::from(MIN_COST)..=i64::from(MAX_COST)).contains(&cost) {
        return Err(DeckError::CostOutOfRange { line, cost });
    }
    let value = parse_number(line, "value", value)?;
    if value <= 0 || value > i64::from(u32::MAX) {
        return Err(DeckError::ValueOutOfRange { line, value });
    }
    Ok((name, cost as u8, value as u32))
}

fn parse_number(line: usize, field: &'static str, text: &str) -> Result<i64, DeckError> {
    text.parse().map_err(|_| DeckError::NotANumber {
        line,
        field,
        text: text.to_string(),
    })
}

fn parse_grid_row(
    line_no: usize,
    line: &str,
    row: usize,
    card: &str,
) -> Result<[InfluenceKind; INFLUENCE_SIZE], DeckError> {
    let symbols: Vec<char> = line.trim_end().chars().collect();
    if symbols.len() != INFLUENCE_SIZE {
        return Err(DeckError::BadRowLength {
            line: line_no,
            len: symbols.len(),
        });
    }

    let mut kinds = [InfluenceKind::None; INFLUENCE_SIZE];
    for (col, &symbol) in symbols.iter().enumerate() {
        let is_center = row == INFLUENCE_CENTER && col == INFLUENCE_CENTER;
        kinds[col] = match (symbol, is_center) {
            (CENTER_SYMBOL, true) => InfluenceKind::Claim,
            (CENTER_SYMBOL, false) => return Err(DeckError::MisplacedCenter { line: line_no }),
            (_, true) => {
                return Err(DeckError::MissingCenter {
                    card: card.to_string(),
                })
            }
            (other, false) => InfluenceKind::from_symbol(other).ok_or(DeckError::UnknownSymbol {
                line: line_no,
                symbol: other,
            })?,
        };
    }
    Ok(kinds)
}
