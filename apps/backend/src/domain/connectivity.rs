//! Heartbeat bookkeeping evaluated on every session tick.

use std::time::Duration;

use super::lobby::{ensure_host, leave};
use super::state::{ConnectionStatus, PlayerId, SessionRecord, SessionStatus};

/// Thresholds for the connectivity rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivityTimings {
    /// Heartbeat age after which an online player is marked offline.
    pub heartbeat_stale: Duration,
    /// Heartbeat age after which an offline player is bot-controlled.
    pub bot_takeover: Duration,
    /// Turn duration after which the active player is bot-controlled.
    pub afk_turn: Duration,
    /// Heartbeat age after which a player is dropped from the roster.
    pub remove_after: Duration,
}

impl Default for ConnectivityTimings {
    fn default() -> Self {
        Self {
            heartbeat_stale: Duration::from_secs(15),
            bot_takeover: Duration::from_secs(30),
            afk_turn: Duration::from_secs(45),
            remove_after: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TakeoverReason {
    Offline,
    Afk,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ConnectivityChange {
    WentOffline(PlayerId),
    CameOnline(PlayerId),
    BotTookOver {
        player_id: PlayerId,
        reason: TakeoverReason,
    },
    BotReleased(PlayerId),
    Removed(PlayerId),
    HostPromoted(PlayerId),
}

fn millis(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}

/// Mark `id` offline right away (the client signalled it is going away).
/// Returns whether anything changed.
pub fn mark_offline(record: &mut SessionRecord, id: &PlayerId, now: i64) -> bool {
    match record.players.get_mut(id) {
        Some(player) if player.status == ConnectionStatus::Online => {
            player.status = ConnectionStatus::Offline;
            player.offline_since = Some(now);
            true
        }
        _ => false,
    }
}

/// Apply the connectivity rules for every player at time `now`.
pub fn evaluate(
    record: &mut SessionRecord,
    now: i64,
    timings: &ConnectivityTimings,
) -> Vec<ConnectivityChange> {
    let mut changes = Vec::new();
    if record.status == SessionStatus::Finished {
        return changes;
    }
    let playing = record.status == SessionStatus::Playing;
    let stale_ms = millis(timings.heartbeat_stale);
    let takeover_ms = millis(timings.bot_takeover);
    let afk_ms = millis(timings.afk_turn);
    let remove_ms = millis(timings.remove_after);

    let host_before = record.host().cloned();
    let ids: Vec<PlayerId> = record.players.keys().cloned().collect();
    for id in ids {
        let Some(player) = record.players.get(&id) else {
            continue;
        };
        if now - player.last_seen > remove_ms {
            leave(record, &id, now);
            changes.push(ConnectivityChange::Removed(id));
            continue;
        }

        let is_turn = record.current_turn.as_ref() == Some(&id);
        let turn_age = record.turn_started_at.map(|t| now - t);
        let Some(player) = record.players.get_mut(&id) else {
            continue;
        };
        let silence = now - player.last_seen;

        match player.status {
            ConnectionStatus::Online if silence > stale_ms => {
                player.status = ConnectionStatus::Offline;
                player.offline_since = Some(now);
                changes.push(ConnectivityChange::WentOffline(id.clone()));
            }
            ConnectionStatus::Offline
                if silence <= stale_ms
                    && player.offline_since.map_or(true, |since| player.last_seen > since) =>
            {
                player.status = ConnectionStatus::Online;
                player.offline_since = None;
                changes.push(ConnectivityChange::CameOnline(id.clone()));
                if player.is_bot {
                    player.is_bot = false;
                    changes.push(ConnectivityChange::BotReleased(id.clone()));
                }
            }
            _ => {}
        }

        if !playing || player.is_bot {
            continue;
        }
        if player.status == ConnectionStatus::Offline && silence > takeover_ms {
            player.is_bot = true;
            changes.push(ConnectivityChange::BotTookOver {
                player_id: id.clone(),
                reason: TakeoverReason::Offline,
            });
        } else if is_turn && turn_age.is_some_and(|age| age > afk_ms) {
            player.is_bot = true;
            changes.push(ConnectivityChange::BotTookOver {
                player_id: id.clone(),
                reason: TakeoverReason::Afk,
            });
        }
    }

    ensure_host(record);
    if let Some(host) = record.host() {
        if host_before.as_ref() != Some(host) {
            changes.push(ConnectivityChange::HostPromoted(host.clone()));
        }
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::deck::DECK_SIZE;
    use crate::domain::test_state_helpers::{pid, playing_session, waiting_session};

    const SEC: i64 = 1000;

    fn beat(record: &mut SessionRecord, who: &str, now: i64) {
        record.players.get_mut(&pid(who)).unwrap().last_seen = now;
    }

    #[test]
    fn disconnect_timeline() {
        let mut s = playing_session(&["alice", "bob"]);
        let t = ConnectivityTimings::default();
        // Keep alice's turn alive so the AFK rule stays out of the way.
        let keep_turn = |s: &mut SessionRecord, now: i64| s.turn_started_at = Some(now);

        beat(&mut s, "alice", 16 * SEC);
        keep_turn(&mut s, 16 * SEC);
        let changes = evaluate(&mut s, 16 * SEC, &t);
        assert_eq!(changes, vec![ConnectivityChange::WentOffline(pid("bob"))]);

        beat(&mut s, "alice", 31 * SEC);
        keep_turn(&mut s, 31 * SEC);
        let changes = evaluate(&mut s, 31 * SEC, &t);
        assert!(changes.contains(&ConnectivityChange::BotTookOver {
            player_id: pid("bob"),
            reason: TakeoverReason::Offline
        }));
        assert!(s.players[&pid("bob")].is_bot);

        beat(&mut s, "bob", 32 * SEC);
        beat(&mut s, "alice", 32 * SEC);
        let changes = evaluate(&mut s, 33 * SEC, &t);
        assert_eq!(
            changes,
            vec![
                ConnectivityChange::CameOnline(pid("bob")),
                ConnectivityChange::BotReleased(pid("bob")),
            ]
        );
        assert!(!s.players[&pid("bob")].is_bot);
    }

    #[test]
    fn afk_turn_hands_control_to_bot() {
        let mut s = playing_session(&["alice", "bob"]);
        let t = ConnectivityTimings::default();
        beat(&mut s, "alice", 46 * SEC);
        beat(&mut s, "bob", 46 * SEC);
        let changes = evaluate(&mut s, 46 * SEC, &t);
        assert_eq!(
            changes,
            vec![ConnectivityChange::BotTookOver {
                player_id: pid("alice"),
                reason: TakeoverReason::Afk
            }]
        );
        // An online, AFK-flagged player stays bot-controlled on later ticks.
        beat(&mut s, "alice", 47 * SEC);
        assert!(evaluate(&mut s, 47 * SEC, &t).is_empty());
        assert!(s.players[&pid("alice")].is_bot);
    }

    #[test]
    fn silent_player_is_removed_and_turn_moves_on() {
        let mut s = playing_session(&["alice", "bob", "carol"]);
        let t = ConnectivityTimings::default();
        beat(&mut s, "bob", 61 * SEC);
        beat(&mut s, "carol", 61 * SEC);
        s.turn_started_at = Some(61 * SEC);
        let changes = evaluate(&mut s, 61 * SEC, &t);
        assert!(changes.contains(&ConnectivityChange::Removed(pid("alice"))));
        assert!(changes.contains(&ConnectivityChange::HostPromoted(pid("bob"))));
        assert!(!s.players.contains_key(&pid("alice")));
        assert_eq!(s.current_turn, Some(pid("bob")));
        assert_eq!(s.card_count(), DECK_SIZE);
        assert_eq!(s.turn_order.len(), 3);
    }

    #[test]
    fn waiting_sessions_never_assign_bots() {
        let mut s = waiting_session(&["alice", "bob"]);
        let t = ConnectivityTimings::default();
        beat(&mut s, "alice", 40 * SEC);
        let changes = evaluate(&mut s, 40 * SEC, &t);
        assert_eq!(changes, vec![ConnectivityChange::WentOffline(pid("bob"))]);
        assert!(!s.players[&pid("bob")].is_bot);

        let changes = evaluate(&mut s, 61 * SEC, &t);
        assert!(changes.contains(&ConnectivityChange::Removed(pid("bob"))));
    }

    #[test]
    fn explicit_offline_waits_for_a_new_heartbeat() {
        let mut s = waiting_session(&["alice", "bob"]);
        let t = ConnectivityTimings::default();
        beat(&mut s, "bob", 5 * SEC);
        assert!(mark_offline(&mut s, &pid("bob"), 5 * SEC));
        assert!(!mark_offline(&mut s, &pid("bob"), 5 * SEC));
        assert!(evaluate(&mut s, 6 * SEC, &t).is_empty());

        beat(&mut s, "bob", 7 * SEC);
        assert_eq!(
            evaluate(&mut s, 8 * SEC, &t),
            vec![ConnectivityChange::CameOnline(pid("bob"))]
        );
    }

    #[test]
    fn finished_sessions_are_left_alone() {
        let mut s = playing_session(&["alice", "bob"]);
        s.status = SessionStatus::Finished;
        assert!(evaluate(&mut s, 500 * SEC, &ConnectivityTimings::default()).is_empty());
        assert_eq!(s.players.len(), 2);
    }
}
