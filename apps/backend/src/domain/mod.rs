//! Domain layer: pure game logic types and helpers.

pub mod board;
pub mod cards_parsing;
pub mod cards_serde;
pub mod cards_types;
pub mod connectivity;
pub mod deck;
pub mod lobby;
pub mod player_view;
pub mod rules;
pub mod seed_derivation;
pub mod sequence;
pub mod session_transition;
pub mod state;
pub mod teams;
pub mod turns;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod test_prelude;
#[cfg(test)]
pub(crate) mod test_state_helpers;
#[cfg(test)]
mod tests_props_legality;
#[cfg(test)]
mod tests_props_playout;

// Re-exports for ergonomics
pub use board::{Board, Chip, Position, Printed, Team, TeamColor, BOARD_SIZE};
pub use cards_parsing::try_parse_cards;
pub use cards_types::{Card, Rank, Suit};
pub use connectivity::{ConnectivityChange, ConnectivityTimings, TakeoverReason};
pub use deck::{Deck, DECK_SIZE};
pub use player_view::{PlayerView, PublicPlayer};
pub use rules::{has_any_legal_move, legal_moves, CandidateMove, MoveKind, Verdict};
pub use sequence::check_win;
pub use session_transition::{derive_session_transitions, SessionTransition};
pub use state::{
    ConnectionStatus, LastMove, PlayerId, PlayerRecord, SessionId, SessionRecord, SessionStatus,
    TurnSlot,
};
pub use turns::{Actor, AppliedMove};
