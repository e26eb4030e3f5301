//! Team assignment and turn order for 2, 3 and 4 players.

use super::board::Team;
use super::rules::{MAX_PLAYERS, MIN_PLAYERS};
use crate::errors::domain::{DomainError, ValidationKind};

/// Required team for each seat index (players sorted by seat).
fn teams_by_seat(count: usize) -> Vec<Team> {
    match count {
        3 => vec![Team::A, Team::B, Team::C],
        n => (0..n)
            .map(|i| if i % 2 == 0 { Team::A } else { Team::B })
            .collect(),
    }
}

/// Whether an existing assignment already has the right team sizes.
fn is_balanced(existing: &[Option<Team>]) -> bool {
    let mut got: Vec<Team> = match existing.iter().copied().collect::<Option<Vec<_>>>() {
        Some(teams) => teams,
        None => return false,
    };
    let mut want = teams_by_seat(existing.len());
    got.sort();
    want.sort();
    got == want
}

/// Teams for players given in seat order. An assignment carried over from
/// a previous start is kept when it is still balanced for this count.
pub fn assign_teams(existing: &[Option<Team>]) -> Result<Vec<Team>, DomainError> {
    let count = existing.len();
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
        return Err(DomainError::validation(
            ValidationKind::InvalidPlayerCount,
            format!("cannot assign teams for {count} players"),
        ));
    }
    if is_balanced(existing) {
        return Ok(existing.iter().flatten().copied().collect());
    }
    Ok(teams_by_seat(count))
}

/// Turn order over `(item, team)` pairs in seat order. With four players
/// the partnerships interleave so teammates never play back to back.
pub fn turn_order<T: Clone>(seated: &[(T, Team)]) -> Vec<(T, Team)> {
    if seated.len() != 4 {
        return seated.to_vec();
    }
    let a: Vec<_> = seated.iter().filter(|(_, t)| *t == Team::A).cloned().collect();
    let b: Vec<_> = seated.iter().filter(|(_, t)| *t == Team::B).cloned().collect();
    a.into_iter()
        .zip(b)
        .flat_map(|(x, y)| [x, y])
        .collect()
}
