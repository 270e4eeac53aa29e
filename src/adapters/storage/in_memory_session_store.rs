//! In-Memory Session Store Adapter
//!
//! Keeps draw sessions in a process-local map. Each entry carries its own
//! async mutex, so updates to one draw are serialized while different draws
//! proceed in parallel. The map lock is only held to find, insert or remove
//! entries.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::domain::draw::{DrawError, DrawSession};
use crate::domain::foundation::{DrawId, ErrorCode, Timestamp};
use crate::ports::{AsyncSessionMutator, Clock, SessionMutator, SessionStore, SweepReport};

#[derive(Debug)]
struct Entry {
    created_at: Timestamp,
    expires_at: Timestamp,
    session: Arc<Mutex<DrawSession>>,
}

impl Entry {
    fn is_expired_at(&self, now: Timestamp) -> bool {
        !now.is_before(&self.expires_at)
    }
}

/// In-memory, time-expiring session store.
#[derive(Clone)]
pub struct InMemorySessionStore {
    entries: Arc<RwLock<HashMap<DrawId, Entry>>>,
    max_sessions: usize,
    clock: Arc<dyn Clock>,
}

impl InMemorySessionStore {
    /// Creates a store holding at most `max_sessions` live sessions.
    pub fn new(max_sessions: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            max_sessions,
            clock,
        }
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }


    /// Finds the live entry for `id` and returns its lock handle.
    async fn live_handle(&self, id: DrawId) -> Result<Arc<Mutex<DrawSession>>, DrawError> {
        let now = self.clock.now();
        {
            let entries = self.entries.read().await;
            match entries.get(&id) {
                None => return Err(DrawError::NotFoundOrExpired),
                Some(entry) if !entry.is_expired_at(now) => return Ok(entry.session.clone()),
                Some(_) => {}
            }
        }

        self.evict_expired(id).await;
        Err(DrawError::NotFoundOrExpired)
    }

    /// Removes `id` if it is (still) expired.
    async fn evict_expired(&self, id: DrawId) {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        if entries.get(&id).is_some_and(|e| e.is_expired_at(now)) {
            entries.remove(&id);
            tracing::debug!(draw_id = %id, "Evicted expired draw on access");
        }
    }

    /// True if `handle` is still the stored entry for `id` and has not expired.
    async fn still_live(&self, id: DrawId, handle: &Arc<Mutex<DrawSession>>) -> bool {
        let now = self.clock.now();
        let entries = self.entries.read().await;
        entries
            .get(&id)
            .is_some_and(|e| Arc::ptr_eq(&e.session, handle) && !e.is_expired_at(now))
    }

    /// Validates a mutated draft and decides whether it may be committed.
    async fn accept_draft(
        &self,
        id: DrawId,
        handle: &Arc<Mutex<DrawSession>>,
        draft: &DrawSession,
    ) -> Result<(), DrawError> {
        if draft.id() != id {
            return Err(DrawError::invariant("mutator changed the draw id"));
        }
        if let Err(e) = draft.check_invariants() {
            tracing::error!(
                draw_id = %id,
                code = %e.code(),
                "Refusing to commit draw: {}",
                e
            );
            return Err(e);
        }
        // Swept or expired while the mutator ran.
        if !self.still_live(id, handle).await {
            return Err(DrawError::NotFoundOrExpired);
        }
        Ok(())
    }

    /// Drops expired entries, then evicts oldest-created until at most `capacity` remain.
    fn sweep_locked(
        &self,
        entries: &mut HashMap<DrawId, Entry>,
        now: Timestamp,
        capacity: usize,
    ) -> SweepReport {
        let before = entries.len();
        entries.retain(|_, e| !e.is_expired_at(now));
        let expired = before - entries.len();

        let mut evicted_for_capacity = 0;
        if entries.len() > capacity {
            let excess = entries.len() - capacity;
            let mut by_age: Vec<(Timestamp, DrawId)> =
                entries.iter().map(|(id, e)| (e.created_at, *id)).collect();
            by_age.sort_by_key(|(created_at, _)| *created_at);

            for (_, id) in by_age.into_iter().take(excess) {
                entries.remove(&id);
                evicted_for_capacity += 1;
            }

            tracing::warn!(
                code = %ErrorCode::CapacityExceeded,
                evicted = evicted_for_capacity,
                max_sessions = self.max_sessions,
                "Session store over capacity, evicted oldest draws"
            );
        }

        SweepReport {
            expired,
            evicted_for_capacity,
            remaining: entries.len(),
        }
    }
}

impl std::fmt::Debug for InMemorySessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemorySessionStore")
            .field("max_sessions", &self.max_sessions)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, session: DrawSession) -> Result<(), DrawError> {
        let id = session.id();
        let now = self.clock.now();
        let mut entries = self.entries.write().await;

        // An expired entry counts as absent; the sweep below drops it.
        if entries.get(&id).is_some_and(|e| !e.is_expired_at(now)) {
            return Err(DrawError::DuplicateId(id));
        }

        // Lazy sweep, leaving room for the new entry.
        let report = self.sweep_locked(&mut entries, now, self.max_sessions.saturating_sub(1));
        if report.removed() > 0 {
            tracing::debug!(
                expired = report.expired,
                evicted = report.evicted_for_capacity,
                "Swept draws on create"
            );
        }

        entries.insert(
            id,
            Entry {
                created_at: session.created_at(),
                expires_at: session.expires_at(),
                session: Arc::new(Mutex::new(session)),
            },
        );
        tracing::debug!(draw_id = %id, total = entries.len(), "Stored new draw");
        Ok(())
    }

    async fn get(&self, id: DrawId) -> Result<DrawSession, DrawError> {
        let handle = self.live_handle(id).await?;
        let snapshot = handle.lock().await.clone();

        if snapshot.is_expired_at(self.clock.now()) {
            self.evict_expired(id).await;
            return Err(DrawError::NotFoundOrExpired);
        }
        Ok(snapshot)
    }

    async fn update(
        &self,
        id: DrawId,
        mutator: SessionMutator<'_>,
    ) -> Result<DrawSession, DrawError> {
        let handle = self.live_handle(id).await?;
        let mut current = handle.lock().await;

        let mut draft = current.clone();
        mutator(&mut draft)?;
        self.accept_draft(id, &handle, &draft).await?;

        *current = draft.clone();
        Ok(draft)
    }

    async fn update_async(
        &self,
        id: DrawId,
        mutator: AsyncSessionMutator<'_>,
    ) -> Result<DrawSession, DrawError> {
        let handle = self.live_handle(id).await?;
        let mut current = handle.lock().await;

        let mut draft = current.clone();
        mutator(&mut draft).await?;
        self.accept_draft(id, &handle, &draft).await?;

        *current = draft.clone();
        Ok(draft)
    }

    async fn sweep(&self) -> SweepReport {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        self.sweep_locked(&mut entries, now, self.max_sessions)
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
