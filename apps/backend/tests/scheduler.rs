mod support;

use std::sync::Arc;
use std::time::Duration;

use sequence_backend::domain::{SessionId, SessionStatus};
use sequence_backend::{EngineConfig, SessionScheduler, SessionStore};
use support::{harness_with, Harness};

fn fast_config() -> EngineConfig {
    EngineConfig {
        tick_interval: Duration::from_millis(10),
        bot_min_delay: Duration::ZERO,
        ..EngineConfig::default()
    }
}

async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..300 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}

async fn make_all_bots(h: &Harness, id: &SessionId) {
    let current = h.store.read(id).await.unwrap();
    let mut record = current.value.clone();
    for player in record.players.values_mut() {
        player.is_bot = true;
    }
    h.store.update(id, record, current.version).await.unwrap();
}

#[tokio::test]
async fn watching_is_idempotent_and_unwatch_stops() {
    let h = harness_with(fast_config());
    let scheduler = SessionScheduler::new(Arc::clone(&h.service));
    let id = h.seated(&["ann", "ben"]).await;

    assert!(scheduler.watch(&id));
    assert!(!scheduler.watch(&id));
    assert_eq!(scheduler.watched_count(), 1);

    assert!(scheduler.unwatch(&id));
    assert!(!scheduler.is_watching(&id));
    assert!(!scheduler.unwatch(&id));
}

#[tokio::test]
async fn bots_play_on_their_own() {
    let h = harness_with(fast_config());
    let scheduler = SessionScheduler::new(Arc::clone(&h.service));
    let id = h.started(&["ann", "ben"]).await;
    make_all_bots(&h, &id).await;
    let start = h.version(&id).await;

    scheduler.watch(&id);
    let mut progressed = false;
    for _ in 0..300 {
        if h.version(&id).await >= start + 3 {
            progressed = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(progressed, "bots never moved");
    assert!(h.record(&id).await.check_invariants().is_ok());

    scheduler.shutdown();
    assert_eq!(scheduler.watched_count(), 0);
}

#[tokio::test]
async fn finished_session_ends_its_task() {
    let h = harness_with(fast_config());
    let scheduler = SessionScheduler::new(Arc::clone(&h.service));
    let id = h.started(&["ann", "ben"]).await;
    scheduler.watch(&id);

    let current = h.store.read(&id).await.unwrap();
    let mut record = current.value.clone();
    record.status = SessionStatus::Finished;
    h.store.update(&id, record, current.version).await.unwrap();

    assert!(eventually(|| !scheduler.is_watching(&id)).await);
}

#[tokio::test]
async fn missing_session_ends_its_task() {
    let h = harness_with(fast_config());
    let scheduler = SessionScheduler::new(Arc::clone(&h.service));
    let ghost = SessionId::from("GHOST1");

    assert!(scheduler.watch(&ghost));
    assert!(eventually(|| !scheduler.is_watching(&ghost)).await);
    // A stopped task frees the slot for a new watch.
    assert!(scheduler.watch(&ghost));
}
