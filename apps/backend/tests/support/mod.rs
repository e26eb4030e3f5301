//! Shared harness for integration tests: in-memory store, manual clock and
//! a seeded bot.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use sequence_backend::ai::HeuristicPlayer;
use sequence_backend::domain::{
    legal_moves, CandidateMove, Card, PlayerId, Position, Printed, SessionId, SessionRecord,
};
use sequence_backend::services::game_flow::CreateSession;
use sequence_backend::utils::clock::ManualClock;
use sequence_backend::{EngineConfig, GameFlowService, InMemorySessionStore, SessionStore};

/// Clock start for every harness (an arbitrary fixed instant).
pub const T0: i64 = 1_700_000_000_000;

#[ctor::ctor]
fn init_logging() {
    backend_test_support::test_logging::init();
}

pub struct Harness {
    pub service: Arc<GameFlowService>,
    pub store: Arc<InMemorySessionStore>,
    pub clock: Arc<ManualClock>,
}

pub fn harness() -> Harness {
    harness_with(EngineConfig::default())
}

pub fn harness_with(config: EngineConfig) -> Harness {
    let store = Arc::new(InMemorySessionStore::new());
    harness_on(Arc::clone(&store) as Arc<dyn SessionStore>, store, config)
}

/// Harness whose service talks to `service_store`; `store` stays available
/// for direct inspection.
pub fn harness_on(
    service_store: Arc<dyn SessionStore>,
    store: Arc<InMemorySessionStore>,
    config: EngineConfig,
) -> Harness {
    let clock = Arc::new(ManualClock::new(T0));
    let service = GameFlowService::new(service_store, clock.clone(), config)
        .expect("valid engine config")
        .with_bot(Arc::new(HeuristicPlayer::new(Some(7))));
    Harness {
        service: Arc::new(service),
        store,
        clock,
    }
}

pub fn pid(s: &str) -> PlayerId {
    PlayerId::from(s)
}

pub fn printed_card(pos: Position) -> Card {
    match pos.printed() {
        Printed::Card(rank, suit) => Card::normal(rank, suit),
        Printed::Corner => panic!("corner has no printed card"),
    }
}

impl Harness {
    pub fn advance(&self, d: Duration) {
        self.clock.advance(d.as_millis() as i64);
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }

    pub async fn create(&self, host: &str, max_players: u8) -> SessionId {
        self.service
            .create_session(CreateSession {
                host_id: pid(host),
                host_name: host.to_string(),
                max_players,
                is_private: false,
                password: None,
            })
            .await
            .expect("create session")
    }

    /// Waiting session with `names` seated in order; the first is host.
    pub async fn seated(&self, names: &[&str]) -> SessionId {
        let id = self.create(names[0], 4).await;
        for name in &names[1..] {
            self.service
                .join_session(&id, &pid(name), name, None)
                .await
                .expect("join");
        }
        id
    }

    pub async fn started(&self, names: &[&str]) -> SessionId {
        let id = self.seated(names).await;
        self.service.start_session(&id).await.expect("start");
        id
    }

    pub async fn record(&self, id: &SessionId) -> SessionRecord {
        self.store.read(id).await.expect("read").value
    }

    pub async fn version(&self, id: &SessionId) -> u64 {
        self.store.read(id).await.expect("read").version
    }

    /// Heartbeat for every listed player.
    pub async fn beat(&self, id: &SessionId, names: &[&str]) {
        for name in names {
            self.service
                .heartbeat(id, &pid(name))
                .await
                .expect("heartbeat");
        }
    }

    /// Some legal move for whoever holds the turn.
    pub async fn any_legal_move(&self, id: &SessionId) -> Option<(PlayerId, CandidateMove)> {
        let record = self.record(id).await;
        let current = record.current_turn.clone()?;
        let player = record.players.get(&current)?;
        let team = player.team?;
        legal_moves(&player.hand, &record.board, team)
            .into_iter()
            .next()
            .map(|mv| (current, mv))
    }
}
