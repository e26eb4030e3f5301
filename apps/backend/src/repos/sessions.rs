//! Session store seam: a versioned document store with compare-and-swap
//! writes and change notification.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::state::{SessionId, SessionRecord};

/// A stored value together with its write version. Versions start at 1 on
/// create and grow by one on every successful update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    pub version: u64,
    pub value: T,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session {0} not found")]
    NotFound(SessionId),
    #[error("version conflict: expected {expected}, found {actual}")]
    VersionConflict { expected: u64, actual: u64 },
    #[error("no free room code after {attempts} attempts")]
    CodeSpaceExhausted { attempts: usize },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Called after every successful create/update of a watched session.
pub type ChangeListener = Arc<dyn Fn(&SessionId, &Versioned<SessionRecord>) + Send + Sync>;

/// Handle returned by [`SessionStore::subscribe`]. Notifications stop when
/// it is dropped or [`Subscription::unsubscribe`] is called.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a new session under a freshly generated room code.
    async fn create(&self, record: SessionRecord) -> Result<Versioned<SessionId>, StoreError>;

    async fn read(&self, id: &SessionId) -> Result<Versioned<SessionRecord>, StoreError>;

    /// Replace the record if its version still equals `expected_version`.
    /// Returns the new version.
    async fn update(
        &self,
        id: &SessionId,
        record: SessionRecord,
        expected_version: u64,
    ) -> Result<u64, StoreError>;

    async fn subscribe(
        &self,
        id: &SessionId,
        listener: ChangeListener,
    ) -> Result<Subscription, StoreError>;

    /// Every stored session, ordered by room code.
    async fn list(&self) -> Result<Vec<(SessionId, Versioned<SessionRecord>)>, StoreError>;
}
