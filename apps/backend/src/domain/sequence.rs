//! Five-in-a-row detection around the most recently placed marker.

use super::board::{Board, Position, Team};

pub const SEQUENCE_LENGTH: usize = 5;

/// Horizontal, vertical, diagonal, anti-diagonal.
pub const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Longest walk in either direction from the origin cell.
const MAX_STEPS: i32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WinCheck {
    pub won: bool,
    /// Contributing cells ordered along the winning axis (5 to 9 cells).
    pub cells: Vec<Position>,
}

/// Cells reached from `origin` stepping `(dr, dc)` while `matches` holds,
/// at most [`MAX_STEPS`] of them. The origin itself is not included.
pub fn walk<F>(origin: Position, (dr, dc): (i32, i32), matches: F) -> Vec<Position>
where
    F: Fn(Position) -> bool,
{
    (1..=MAX_STEPS)
        .map_while(|n| origin.offset(dr, dc, n).filter(|&p| matches(p)))
        .collect()
}

/// The contiguous line through `origin` along one axis, ordered from the
/// backward end to the forward end. `origin` is always included.
pub fn line_through<F>(origin: Position, dir: (i32, i32), matches: F) -> Vec<Position>
where
    F: Fn(Position) -> bool,
{
    let mut back = walk(origin, (-dir.0, -dir.1), &matches);
    back.reverse();
    back.push(origin);
    back.extend(walk(origin, dir, &matches));
    back
}

/// Whether the marker just placed at `last` completes a line for `team`.
pub fn check_win(board: &Board, last: Position, team: Team) -> WinCheck {
    for dir in DIRECTIONS {
        let line = line_through(last, dir, |p| board.counts_for(p, team));
        if line.len() >= SEQUENCE_LENGTH {
            return WinCheck {
                won: true,
                cells: line,
            };
        }
    }
    WinCheck::default()
}
