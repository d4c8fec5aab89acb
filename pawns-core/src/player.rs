//! Player colors, decks and hands

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::error::GameError;

/// Player color. Red seeds the left column and moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Red = 0,
    Blue = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Red => Player::Blue,
            Player::Blue => Player::Red,
        }
    }

    /// Single-letter tag used in textual rendering
    pub fn symbol(self) -> char {
        match self {
            Player::Red => 'R',
            Player::Blue => 'B',
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// A player's deck and hand.
///
/// The deck is ordered (front = next draw) and disjoint from the hand.
/// Cards leave the hand only by being placed on the board.
#[derive(Clone, Debug)]
pub struct PlayerState {
    color: Player,
    deck: VecDeque<Card>,
    hand: Vec<Card>,
    hand_limit: usize,
}

impl PlayerState {
    pub fn new(color: Player, hand_limit: usize) -> Result<Self, GameError> {
        if hand_limit == 0 {
            return Err(GameError::InvalidHandSize);
        }
        Ok(Self {
            color,
            deck: VecDeque::new(),
            hand: Vec::new(),
            hand_limit,
        })
    }

    /// Convenience constructor: new player with a bound deck
    pub fn with_deck(color: Player, hand_limit: usize, cards: Vec<Card>) -> Result<Self, GameError> {
        let mut state = Self::new(color, hand_limit)?;
        state.set_deck(cards)?;
        Ok(state)
    }

    /// Bind every card to this player and install it as the deck.
    /// Clears the hand. Fails without side effects if any card is owned.
    pub fn set_deck(&mut self, mut cards: Vec<Card>) -> Result<(), GameError> {
        if cards.is_empty() {
            return Err(GameError::EmptyDeck);
        }
        if let Some(owned) = cards.iter().find(|c| c.owner().is_some()) {
            return Err(GameError::OwnerAlreadyBound(owned.name().to_string()));
        }
        for card in &mut cards {
            card.bind_owner(self.color)?;
        }
        self.deck = cards.into();
        self.hand.clear();
        Ok(())
    }

    pub fn color(&self) -> Player {
        self.color
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn hand_limit(&self) -> usize {
        self.hand_limit
    }

    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    pub fn deck(&self) -> impl Iterator<Item = &Card> + '_ {
        self.deck.iter()
    }

    pub fn card_at(&self, index: usize) -> Result<&Card, GameError> {
        self.hand.get(index).ok_or(GameError::InvalidHandIndex {
            index,
            len: self.hand.len(),
        })
    }

    /// Move the front of the deck to the back of the hand
    pub fn draw(&mut self) -> Result<(), GameError> {
        let card = self.deck.pop_front().ok_or(GameError::EmptyDeck)?;
        self.hand.push(card);
        Ok(())
    }

    /// Draw while the hand is below its limit and the deck has cards
    pub(crate) fn refill(&mut self) {
        while self.hand.len() < self.hand_limit {
            match self.deck.pop_front() {
                Some(card) => self.hand.push(card),
                None => break,
            }
        }
    }

    pub(crate) fn take_from_hand(&mut self, index: usize) -> Card {
        self.hand.remove(index)
    }
}
