//! Scoped borrow of a pooled session

use std::ops::{Deref, DerefMut};
use std::sync::Weak;

use super::pool::PoolInner;
use crate::session::Session;

/// A session borrowed from a [`Pool`](crate::Pool).
///
/// Dereferences to the underlying [`Session`]. On drop the session is
/// handed back to the pool; if the pool has already been torn down the
/// session is closed in place instead. The handle is move-only and the
/// return runs at most once.
pub struct PooledSession {
    session: Option<Session>,
    pool: Weak<PoolInner>,
}

impl std::fmt::Debug for PooledSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledSession").finish_non_exhaustive()
    }
}

impl PooledSession {
    pub(crate) fn new(session: Session, pool: Weak<PoolInner>) -> Self {
        Self {
            session: Some(session),
            pool,
        }
    }

    /// Drop the session instead of returning it to the pool.
    ///
    /// For callers that have observed the session to be beyond repair.
    /// The pool's count shrinks by one and the producer grows a
    /// replacement on demand.
    pub fn release(mut self) {
        if let Some(session) = self.session.take() {
            match self.pool.upgrade() {
                Some(pool) => pool.discard(session),
                None => tracing::debug!("pool is gone, closing released session in place"),
            }
        }
    }
}

impl Deref for PooledSession {
    type Target = Session;

    fn deref(&self) -> &Session {
        self.session.as_ref().expect("session already returned")
    }
}

impl DerefMut for PooledSession {
    fn deref_mut(&mut self) -> &mut Session {
        self.session.as_mut().expect("session already returned")
    }
}

impl Drop for PooledSession {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            match self.pool.upgrade() {
                Some(pool) => pool.restore(session),
                None => tracing::debug!("pool is gone, closing borrowed session in place"),
            }
        }
    }
}
