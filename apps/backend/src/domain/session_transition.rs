use super::board::Team;
use super::state::{PlayerId, SessionRecord, SessionStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionTransition {
    /// Edge-triggered: the turn became a specific player.
    TurnBecame { player_id: PlayerId },

    /// Edge-triggered: waiting -> playing
    GameStarted,

    /// Edge-triggered: playing -> finished
    GameEnded { winner: Option<Team> },

    PlayerJoined { player_id: PlayerId },

    PlayerLeft { player_id: PlayerId },

    HostChanged { player_id: PlayerId },

    /// Bot control switched on or off for a player.
    BotControl { player_id: PlayerId, is_bot: bool },
}

/// Derive transitions from the before/after records of one mutation.
pub fn derive_session_transitions(
    before: &SessionRecord,
    after: &SessionRecord,
) -> Vec<SessionTransition> {
    let mut transitions = Vec::new();

    for id in after.players.keys() {
        if !before.players.contains_key(id) {
            transitions.push(SessionTransition::PlayerJoined {
                player_id: id.clone(),
            });
        }
    }
    for id in before.players.keys() {
        if !after.players.contains_key(id) {
            transitions.push(SessionTransition::PlayerLeft {
                player_id: id.clone(),
            });
        }
    }

    if before.status == SessionStatus::Waiting && after.status == SessionStatus::Playing {
        transitions.push(SessionTransition::GameStarted);
    }

    // A move that repeats the same player (two-player wrap after a leave)
    // still starts a new turn.
    let turn_restarted = after.turn_started_at != before.turn_started_at;
    if let Some(player_id) = &after.current_turn {
        if before.current_turn.as_ref() != Some(player_id) || turn_restarted {
            transitions.push(SessionTransition::TurnBecame {
                player_id: player_id.clone(),
            });
        }
    }

    if before.status != SessionStatus::Finished && after.status == SessionStatus::Finished {
        transitions.push(SessionTransition::GameEnded {
            winner: after.winner_team,
        });
    }

    if let Some(host) = after.host() {
        if before.host() != Some(host) {
            transitions.push(SessionTransition::HostChanged {
                player_id: host.clone(),
            });
        }
    }

    for (id, player) in &after.players {
        let was_bot = before.players.get(id).is_some_and(|p| p.is_bot);
        if player.is_bot != was_bot {
            transitions.push(SessionTransition::BotControl {
                player_id: id.clone(),
                is_bot: player.is_bot,
            });
        }
    }

    transitions
}
