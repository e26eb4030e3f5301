//! The 10×10 board: static printed layout plus the dynamic marker overlay.

use serde::{Deserialize, Serialize};

use super::cards_types::Rank::{Ace, Eight, Five, Four, King, Nine, Queen, Seven, Six, Ten, Three, Two};
use super::cards_types::Suit::{Clubs, Diamonds, Hearts, Spades};
use super::cards_types::{Card, Rank, Suit};
use crate::errors::domain::{DomainError, ValidationKind};

pub const BOARD_SIZE: usize = 10;
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// What is printed on a cell.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Printed {
    Corner,
    Card(Rank, Suit),
}

impl Printed {
    /// Whether a normal card matches this printed value.
    pub fn matches(&self, card: &Card) -> bool {
        match (self, card) {
            (Printed::Card(r, s), Card::Normal { rank, suit }) => r == rank && s == suit,
            _ => false,
        }
    }
}

const X: Printed = Printed::Corner;

const fn p(rank: Rank, suit: Suit) -> Printed {
    Printed::Card(rank, suit)
}

/// Printed layout, identical for every session. Each of the 48 non-jack
/// values appears exactly twice; the four corners are wild.
pub const LAYOUT: [[Printed; BOARD_SIZE]; BOARD_SIZE] = [
    [X, p(Two, Spades), p(Three, Spades), p(Four, Spades), p(Five, Spades), p(Six, Spades), p(Seven, Spades), p(Eight, Spades), p(Nine, Spades), X],
    [p(Six, Clubs), p(Five, Clubs), p(Four, Clubs), p(Three, Clubs), p(Two, Clubs), p(Ace, Hearts), p(King, Hearts), p(Queen, Hearts), p(Ten, Hearts), p(Ten, Spades)],
    [p(Seven, Clubs), p(Ace, Spades), p(Two, Diamonds), p(Three, Diamonds), p(Four, Diamonds), p(Five, Diamonds), p(Six, Diamonds), p(Seven, Diamonds), p(Nine, Hearts), p(Queen, Spades)],
    [p(Eight, Clubs), p(King, Spades), p(Six, Clubs), p(Five, Clubs), p(Four, Clubs), p(Three, Clubs), p(Two, Clubs), p(Eight, Diamonds), p(Eight, Hearts), p(King, Spades)],
    [p(Nine, Clubs), p(Queen, Spades), p(Seven, Clubs), p(Six, Hearts), p(Five, Hearts), p(Four, Hearts), p(Ace, Hearts), p(Nine, Diamonds), p(Seven, Hearts), p(Ace, Spades)],
    [p(Ten, Clubs), p(Ten, Spades), p(Eight, Clubs), p(Seven, Hearts), p(Two, Hearts), p(Three, Hearts), p(King, Hearts), p(Ten, Diamonds), p(Six, Hearts), p(Two, Diamonds)],
    [p(Queen, Clubs), p(Nine, Spades), p(Nine, Clubs), p(Eight, Hearts), p(Nine, Hearts), p(Ten, Hearts), p(Queen, Hearts), p(Queen, Diamonds), p(Five, Hearts), p(Three, Diamonds)],
    [p(King, Clubs), p(Eight, Spades), p(Ten, Clubs), p(Queen, Clubs), p(King, Clubs), p(Ace, Clubs), p(Ace, Diamonds), p(King, Diamonds), p(Four, Hearts), p(Four, Diamonds)],
    [p(Ace, Clubs), p(Seven, Spades), p(Six, Spades), p(Five, Spades), p(Four, Spades), p(Three, Spades), p(Two, Spades), p(Two, Hearts), p(Three, Hearts), p(Five, Diamonds)],
    [X, p(Ace, Diamonds), p(King, Diamonds), p(Queen, Diamonds), p(Ten, Diamonds), p(Nine, Diamonds), p(Eight, Diamonds), p(Seven, Diamonds), p(Six, Diamonds), X],
];

/// A team in play. Two players use A/B, three use A/B/C, four play as
/// two partnerships of A and B.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Team {
    A,
    B,
    C,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamColor {
    Red,
    Blue,
    Green,
}

impl Team {
    pub const fn color(&self) -> TeamColor {
        match self {
            Team::A => TeamColor::Red,
            Team::B => TeamColor::Blue,
            Team::C => TeamColor::Green,
        }
    }
}

/// A board coordinate that is always in bounds.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPosition", into = "RawPosition")]
pub struct Position {
    row: u8,
    col: u8,
}

#[derive(Serialize, Deserialize)]
struct RawPosition {
    r: i32,
    c: i32,
}

impl TryFrom<RawPosition> for Position {
    type Error = DomainError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Position::try_new(raw.r, raw.c)
    }
}

impl From<Position> for RawPosition {
    fn from(pos: Position) -> Self {
        RawPosition {
            r: i32::from(pos.row),
            c: i32::from(pos.col),
        }
    }
}

impl Position {
    pub fn new(row: i32, col: i32) -> Option<Self> {
        let in_range = |v: i32| (0..BOARD_SIZE as i32).contains(&v);
        (in_range(row) && in_range(col)).then(|| Position {
            row: row as u8,
            col: col as u8,
        })
    }

    pub fn try_new(row: i32, col: i32) -> Result<Self, DomainError> {
        Self::new(row, col).ok_or_else(|| {
            DomainError::validation(
                ValidationKind::InvalidPosition,
                format!("({row},{col}) is outside the board"),
            )
        })
    }

    pub const fn row(&self) -> usize {
        self.row as usize
    }

    pub const fn col(&self) -> usize {
        self.col as usize
    }

    /// Step by `(dr, dc)` times `n`; `None` when leaving the board.
    pub fn offset(&self, dr: i32, dc: i32, n: i32) -> Option<Position> {
        Position::new(self.row as i32 + dr * n, self.col as i32 + dc * n)
    }

    pub fn is_corner(&self) -> bool {
        matches!(self.printed(), Printed::Corner)
    }

    pub fn printed(&self) -> Printed {
        LAYOUT[self.row()][self.col()]
    }

    fn index(&self) -> usize {
        self.row() * BOARD_SIZE + self.col()
    }

    /// All cells, row-major.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE as u8).flat_map(|row| (0..BOARD_SIZE as u8).map(move |col| Position { row, col }))
    }
}

/// A marker on the board together with the card spent to place it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Chip {
    pub team: Team,
    pub card: Card,
}

/// Dynamic overlay, persisted as a flat 100-entry array of `null | chip`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Option<Chip>>", into = "Vec<Option<Chip>>")]
pub struct Board {
    cells: Vec<Option<Chip>>,
}

impl TryFrom<Vec<Option<Chip>>> for Board {
    type Error = DomainError;

    fn try_from(cells: Vec<Option<Chip>>) -> Result<Self, Self::Error> {
        if cells.len() != CELL_COUNT {
            return Err(DomainError::corruption(format!(
                "board has {} cells, expected {CELL_COUNT}",
                cells.len()
            )));
        }
        if Position::all().any(|p| p.is_corner() && cells[p.index()].is_some()) {
            return Err(DomainError::corruption("corner cell is occupied"));
        }
        Ok(Board { cells })
    }
}

impl From<Board> for Vec<Option<Chip>> {
    fn from(board: Board) -> Self {
        board.cells
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    pub fn empty() -> Self {
        Board {
            cells: vec![None; CELL_COUNT],
        }
    }

    pub fn chip(&self, pos: Position) -> Option<&Chip> {
        self.cells[pos.index()].as_ref()
    }

    pub fn owner(&self, pos: Position) -> Option<Team> {
        self.chip(pos).map(|c| c.team)
    }

    /// Empty and not a corner.
    pub fn is_open(&self, pos: Position) -> bool {
        !pos.is_corner() && self.chip(pos).is_none()
    }

    /// Whether the cell counts toward `team`'s lines (own marker or corner).
    pub fn counts_for(&self, pos: Position, team: Team) -> bool {
        pos.is_corner() || self.owner(pos) == Some(team)
    }

    pub fn place(&mut self, pos: Position, team: Team, card: Card) -> Result<(), DomainError> {
        if !self.is_open(pos) {
            return Err(DomainError::validation(
                ValidationKind::IllegalMove,
                "cell is not open",
            ));
        }
        self.cells[pos.index()] = Some(Chip {
            team,
            card,
        });
        Ok(())
    }

    pub fn remove(&mut self, pos: Position) -> Result<Chip, DomainError> {
        match self.cells[pos.index()] {
            Some(chip) => {
                self.cells[pos.index()] = None;
                Ok(chip)
            }
            None => Err(DomainError::validation(
                ValidationKind::IllegalMove,
                "no removable marker on cell",
            )),
        }
    }

    pub fn occupied(&self) -> impl Iterator<Item = (Position, &Chip)> {
        Position::all().filter_map(move |p| self.chip(p).map(|c| (p, c)))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}
