//! Core card-related types: Card, Rank, Suit

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];
}

/// Ranks printed on the board. Jacks are never printed and live only
/// in [`Card`]'s jack variants.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 12] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Queen,
        Rank::King,
    ];
}

/// A playing card, classified once at the parsing boundary.
///
/// Jacks of clubs and diamonds are two-eyed (wild placement), jacks of
/// spades and hearts are one-eyed (remove an opponent marker). Build jacks
/// through [`Card::jack`] so the eye classification always matches the suit.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Card {
    Normal { rank: Rank, suit: Suit },
    TwoEyedJack(Suit),
    OneEyedJack(Suit),
}

impl Card {
    pub const fn normal(rank: Rank, suit: Suit) -> Self {
        Card::Normal { rank, suit }
    }

    pub const fn jack(suit: Suit) -> Self {
        match suit {
            Suit::Clubs | Suit::Diamonds => Card::TwoEyedJack(suit),
            Suit::Spades | Suit::Hearts => Card::OneEyedJack(suit),
        }
    }

    pub const fn suit(&self) -> Suit {
        match self {
            Card::Normal { suit, .. } => *suit,
            Card::TwoEyedJack(suit) | Card::OneEyedJack(suit) => *suit,
        }
    }

    pub const fn is_two_eyed(&self) -> bool {
        matches!(self, Card::TwoEyedJack(_))
    }

    pub const fn is_one_eyed(&self) -> bool {
        matches!(self, Card::OneEyedJack(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jack_eyes_follow_suit() {
        assert!(Card::jack(Suit::Clubs).is_two_eyed());
        assert!(Card::jack(Suit::Diamonds).is_two_eyed());
        assert!(Card::jack(Suit::Spades).is_one_eyed());
        assert!(Card::jack(Suit::Hearts).is_one_eyed());
        assert_eq!(Card::jack(Suit::Hearts).suit(), Suit::Hearts);
    }

    #[test]
    fn normal_cards_are_not_jacks() {
        let c = Card::normal(Rank::Queen, Suit::Spades);
        assert!(!c.is_two_eyed());
        assert!(!c.is_one_eyed());
        assert_eq!(c.suit(), Suit::Spades);
    }
}
