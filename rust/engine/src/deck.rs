use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::cards::{full_deck, Card};
use crate::errors::DeckError;
use crate::rng::{fisher_yates, RandomSource};

/// An ordered 52-card deck with a dealing cursor.
///
/// Every operation returns a new deck; the receiver is never modified, so a
/// snapshot held by the caller stays valid after dealing.
///
/// # Examples
///
/// ```
/// use holdem_engine::deck::Deck;
/// use holdem_engine::rng::SeededRandom;
///
/// let deck = Deck::new().shuffled(&mut SeededRandom::new(42));
/// let (deck, hole) = deck.deal(2).unwrap();
/// assert_eq!(hole.len(), 2);
/// assert_eq!(deck.remaining(), 50);
/// ```
///
/// Deserializing checks the same invariants as [`Deck::from_cards`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredDeck")]
pub struct Deck {
    /// Cards in dealing order
    cards: Vec<Card>,
    /// Index of the next card to deal
    position: usize,
}

impl Deck {
    /// Canonical order: suits clubs, diamonds, hearts, spades; ranks two to ace.
    pub fn new() -> Self {
        Self {
            cards: full_deck(),
            position: 0,
        }
    }

    /// Rebuilds a deck from a stored order, e.g. to replay a recorded hand.
    pub fn from_cards(cards: Vec<Card>) -> Result<Self, DeckError> {
        let unique: HashSet<Card> = cards.iter().copied().collect();
        if cards.len() != 52 || unique.len() != 52 {
            return Err(DeckError::MalformedDeck(unique.len()));
        }
        Ok(Self { cards, position: 0 })
    }

    pub fn shuffled(&self, rng: &mut dyn RandomSource) -> Self {
        Self {
            cards: fisher_yates(rng, &self.cards),
            position: 0,
        }
    }

    pub fn deal(&self, n: usize) -> Result<(Self, Vec<Card>), DeckError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(DeckError::InsufficientCards {
                requested: n,
                remaining,
            });
        }
        let start = self.position;
        let dealt = self.cards[start..start + n].to_vec();
        let next = Self {
            cards: self.cards.clone(),
            position: start + n,
        };
        Ok((next, dealt))
    }

    /// Discards the top card.
    pub fn burn(&self) -> Result<Self, DeckError> {
        self.deal(1).map(|(deck, _)| deck)
    }

    /// Restores the cursor without reshuffling.
    pub fn reset(&self) -> Self {
        Self {
            cards: self.cards.clone(),
            position: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.position
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct StoredDeck {
    cards: Vec<Card>,
    position: usize,
}

impl TryFrom<StoredDeck> for Deck {
    type Error = DeckError;

    fn try_from(stored: StoredDeck) -> Result<Self, Self::Error> {
        let deck = Deck::from_cards(stored.cards)?;
        let len = deck.cards.len();
        if stored.position > len {
            return Err(DeckError::InvalidPosition {
                position: stored.position,
                len,
            });
        }
        Ok(Self {
            position: stored.position,
            ..deck
        })
    }
}
