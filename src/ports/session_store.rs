//! Session Store Port - keyed, expiring storage for draw sessions.
//!
//! The store owns atomicity. Every mutation of a session goes through
//! `update` or `update_async`, which serialize callers per draw id and
//! commit the mutator's changes only when it returns `Ok`.

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::domain::draw::{DrawError, DrawSession};
use crate::domain::foundation::DrawId;

/// Synchronous mutator applied under the per-draw lock.
///
/// Results the caller needs back can be written to captured locals.
pub type SessionMutator<'a> =
    Box<dyn FnOnce(&mut DrawSession) -> Result<(), DrawError> + Send + 'a>;

/// Mutator that may await while holding the per-draw lock.
///
/// The returned future borrows only the session, so anything else it uses
/// must be moved in (clone `Arc`s before building the future).
pub type AsyncSessionMutator<'a> = Box<
    dyn for<'s> FnOnce(&'s mut DrawSession) -> BoxFuture<'s, Result<(), DrawError>> + Send + 'a,
>;

/// Boxes a synchronous mutator.
pub fn mutator<'a, F>(f: F) -> SessionMutator<'a>
where
    F: FnOnce(&mut DrawSession) -> Result<(), DrawError> + Send + 'a,
{
    Box::new(f)
}

/// Boxes an async mutator, pinning down the higher-ranked closure signature.
///
/// ```ignore
/// store.update_async(id, async_mutator(move |session| Box::pin(async move {
///     session.reveal(0)
/// }))).await?;
/// ```
pub fn async_mutator<'a, F>(f: F) -> AsyncSessionMutator<'a>
where
    F: for<'s> FnOnce(&'s mut DrawSession) -> BoxFuture<'s, Result<(), DrawError>> + Send + 'a,
{
    Box::new(f)
}

/// Outcome of a sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Entries dropped because they passed their expiry.
    pub expired: usize,
    /// Live entries evicted, oldest first, to get back under capacity.
    pub evicted_for_capacity: usize,
    /// Entries left after the sweep.
    pub remaining: usize,
}

impl SweepReport {
    pub fn removed(&self) -> usize {
        self.expired + self.evicted_for_capacity
    }
}

/// Port for storing draw sessions.
///
/// Expired sessions are treated as nonexistent by every operation.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Inserts a new session.
    ///
    /// # Errors
    ///
    /// Returns `DrawError::DuplicateId` if the id is already present.
    async fn create(&self, session: DrawSession) -> Result<(), DrawError>;

    /// Returns a snapshot of a live session.
    ///
    /// # Errors
    ///
    /// Returns `DrawError::NotFoundOrExpired` for missing or expired ids.
    async fn get(&self, id: DrawId) -> Result<DrawSession, DrawError>;

    /// Applies `mutator` atomically relative to this id.
    ///
    /// The mutator sees a private copy. The copy replaces the stored session
    /// only if the mutator returns `Ok` and the result passes its invariant
    /// check. Any error leaves the stored session unchanged. Returns the
    /// committed snapshot.
    async fn update(
        &self,
        id: DrawId,
        mutator: SessionMutator<'_>,
    ) -> Result<DrawSession, DrawError>;

    /// Like `update`, but the mutator may await.
    async fn update_async(
        &self,
        id: DrawId,
        mutator: AsyncSessionMutator<'_>,
    ) -> Result<DrawSession, DrawError>;

    /// Drops expired sessions, then evicts the oldest-created until within capacity.
    async fn sweep(&self) -> SweepReport;

    /// Number of stored sessions, expired ones included until swept.
    async fn len(&self) -> usize;
}
