//! In-process session store. Compare-and-swap runs under the map's shard
//! lock for the one session; listeners are called after it is released.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::state::{SessionId, SessionRecord};
use crate::repos::sessions::{
    ChangeListener, SessionStore, StoreError, Subscription, Versioned,
};
use crate::utils::room_code::generate_room_code;

/// Room code draws before giving up on create.
pub const MAX_CODE_ATTEMPTS: usize = 16;

type CodeGenerator = Box<dyn Fn() -> String + Send + Sync>;
type ListenerRegistry = DashMap<SessionId, DashMap<Uuid, ChangeListener>>;

pub struct InMemorySessionStore {
    sessions: DashMap<SessionId, Versioned<SessionRecord>>,
    listeners: Arc<ListenerRegistry>,
    codes: CodeGenerator,
    unavailable: AtomicBool,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::with_code_generator(generate_room_code)
    }

    /// Store that draws room codes from `codes` (tests force collisions).
    pub fn with_code_generator(codes: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self {
            sessions: DashMap::new(),
            listeners: Arc::new(DashMap::new()),
            codes: Box::new(codes),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Simulate an outage: every call fails with `Unavailable` while set.
    pub fn set_unavailable(&self, down: bool) {
        self.unavailable.store(down, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store marked down".into()));
        }
        Ok(())
    }

    fn notify(&self, id: &SessionId, snapshot: &Versioned<SessionRecord>) {
        let targets: Vec<ChangeListener> = match self.listeners.get(id) {
            Some(entry) => entry.iter().map(|l| l.value().clone()).collect(),
            None => return,
        };
        for listener in targets {
            listener(id, snapshot);
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, record: SessionRecord) -> Result<Versioned<SessionId>, StoreError> {
        self.check_available()?;
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let id = SessionId::from((self.codes)());
            let snapshot = match self.sessions.entry(id.clone()) {
                Entry::Occupied(_) => {
                    debug!(session_id = %id, attempt, "room code collision");
                    continue;
                }
                Entry::Vacant(slot) => {
                    let stored = Versioned {
                        version: 1,
                        value: record,
                    };
                    slot.insert(stored.clone());
                    stored
                }
            };
            self.notify(&id, &snapshot);
            return Ok(Versioned { version: 1, value: id });
        }
        warn!(attempts = MAX_CODE_ATTEMPTS, "room code space exhausted");
        Err(StoreError::CodeSpaceExhausted {
            attempts: MAX_CODE_ATTEMPTS,
        })
    }

    async fn read(&self, id: &SessionId) -> Result<Versioned<SessionRecord>, StoreError> {
        self.check_available()?;
        self.sessions
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn update(
        &self,
        id: &SessionId,
        record: SessionRecord,
        expected_version: u64,
    ) -> Result<u64, StoreError> {
        self.check_available()?;
        let snapshot = {
            let mut entry = self
                .sessions
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            if entry.version != expected_version {
                return Err(StoreError::VersionConflict {
                    expected: expected_version,
                    actual: entry.version,
                });
            }
            entry.version += 1;
            entry.value = record;
            entry.value().clone()
        };
        self.notify(id, &snapshot);
        Ok(snapshot.version)
    }

    async fn subscribe(
        &self,
        id: &SessionId,
        listener: ChangeListener,
    ) -> Result<Subscription, StoreError> {
        self.check_available()?;
        let token = Uuid::new_v4();
        self.listeners
            .entry(id.clone())
            .or_default()
            .insert(token, listener);

        let registry = Arc::clone(&self.listeners);
        let key = id.clone();
        Ok(Subscription::new(move || {
            if let Some(entry) = registry.get(&key) {
                entry.remove(&token);
            }
            registry.remove_if(&key, |_, entry| entry.is_empty());
        }))
    }

    async fn list(&self) -> Result<Vec<(SessionId, Versioned<SessionRecord>)>, StoreError> {
        self.check_available()?;
        let mut all: Vec<_> = self
            .sessions
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(all)
    }
}
