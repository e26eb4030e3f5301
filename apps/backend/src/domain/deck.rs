//! Draw pile, discard pile and the reshuffle rule.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use super::cards_types::{Card, Rank, Suit};
use super::seed_derivation::derive_shuffle_seed;

/// Two 52-card decks, jacks included.
pub const DECK_SIZE: usize = 104;

/// Generate the 104 cards in a fixed order.
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for _ in 0..2 {
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                deck.push(Card::normal(rank, suit));
            }
            deck.push(Card::jack(suit));
        }
    }
    deck
}

/// Fisher-Yates shuffle driven by a seeded ChaCha stream.
pub fn shuffle_with_seed(cards: &mut [Card], seed: [u8; 32]) {
    let mut rng = ChaCha20Rng::from_seed(seed);
    cards.shuffle(&mut rng);
}

/// Card piles of a session. The top of each pile is the end of its vector.
///
/// Flattened into the session record as `deck`, `discardPile` and
/// `shuffleCount`.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    #[serde(rename = "deck")]
    pub draw_pile: Vec<Card>,
    pub discard_pile: Vec<Card>,
    /// Number of shuffles performed so far; feeds seed derivation.
    pub shuffle_count: u32,
}

impl Deck {
    /// A fresh, shuffled 104-card draw pile.
    pub fn fresh(rng_seed: u64, shuffle_count: u32) -> Self {
        let mut draw_pile = full_deck();
        shuffle_with_seed(&mut draw_pile, derive_shuffle_seed(rng_seed, shuffle_count));
        Deck {
            draw_pile,
            discard_pile: Vec::new(),
            shuffle_count: shuffle_count + 1,
        }
    }

    /// Move the discard pile into an empty draw pile under a fresh shuffle.
    /// Returns whether a reshuffle happened.
    pub fn reshuffle_if_empty(&mut self, rng_seed: u64) -> bool {
        if !self.draw_pile.is_empty() || self.discard_pile.is_empty() {
            return false;
        }
        let mut cards = std::mem::take(&mut self.discard_pile);
        shuffle_with_seed(&mut cards, derive_shuffle_seed(rng_seed, self.shuffle_count));
        self.shuffle_count += 1;
        self.draw_pile = cards;
        true
    }

    /// Draw the top card, reshuffling the discard pile first when needed.
    /// `None` only when both piles are empty.
    pub fn draw(&mut self, rng_seed: u64) -> Option<Card> {
        self.reshuffle_if_empty(rng_seed);
        self.draw_pile.pop()
    }

    pub fn discard(&mut self, card: Card) {
        self.discard_pile.push(card);
    }

    pub fn len(&self) -> usize {
        self.draw_pile.len() + self.discard_pile.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
