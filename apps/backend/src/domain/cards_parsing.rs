//! Card parsing and display ("10♠", "J♣", plus ASCII "TS"/"10S"/"JC")

use std::fmt;
use std::str::FromStr;

use super::cards_types::{Card, Rank, Suit};
use crate::errors::domain::{DomainError, ValidationKind};

impl Rank {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

impl Suit {
    pub const fn symbol(&self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        }
    }

    fn from_char(ch: char) -> Option<Suit> {
        match ch {
            '♣' | 'C' => Some(Suit::Clubs),
            '♦' | 'D' => Some(Suit::Diamonds),
            '♥' | 'H' => Some(Suit::Hearts),
            '♠' | 'S' => Some(Suit::Spades),
            _ => None,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Normal { rank, suit } => write!(f, "{}{}", rank.as_str(), suit.symbol()),
            Card::TwoEyedJack(suit) | Card::OneEyedJack(suit) => write!(f, "J{}", suit.symbol()),
        }
    }
}

fn parse_err(s: &str) -> DomainError {
    DomainError::validation(ValidationKind::ParseCard, format!("Parse card: {s}"))
}

impl FromStr for Card {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let suit_ch = chars.next_back().ok_or_else(|| parse_err(s))?;
        let suit = Suit::from_char(suit_ch).ok_or_else(|| parse_err(s))?;
        let card = match chars.as_str() {
            "2" => Card::normal(Rank::Two, suit),
            "3" => Card::normal(Rank::Three, suit),
            "4" => Card::normal(Rank::Four, suit),
            "5" => Card::normal(Rank::Five, suit),
            "6" => Card::normal(Rank::Six, suit),
            "7" => Card::normal(Rank::Seven, suit),
            "8" => Card::normal(Rank::Eight, suit),
            "9" => Card::normal(Rank::Nine, suit),
            "10" | "T" => Card::normal(Rank::Ten, suit),
            "J" => Card::jack(suit),
            "Q" => Card::normal(Rank::Queen, suit),
            "K" => Card::normal(Rank::King, suit),
            "A" => Card::normal(Rank::Ace, suit),
            _ => return Err(parse_err(s)),
        };
        Ok(card)
    }
}

/// Non-panicking helper to parse card tokens into Card instances.
pub fn try_parse_cards<I, S>(tokens: I) -> Result<Vec<Card>, DomainError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|s| s.as_ref().parse::<Card>())
        .collect()
}
