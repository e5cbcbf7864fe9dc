//! Per-session mutual exclusion.
//!
//! The store guards its map with one lock, but a handler reads, mutates, and
//! writes back in separate calls. Holding the session's guard across all three
//! linearises mutations of one session while other sessions proceed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

/// Hands out one async mutex per session id.
///
/// A slot lives only while someone holds or waits for it, so ids that never
/// resolve to a session do not accumulate.
#[derive(Debug, Default)]
pub struct SessionLocks {
    slots: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

/// Exclusive access to one session. Dropping it releases the session and
/// forgets its slot when nobody else is waiting.
#[derive(Debug)]
#[must_use = "the session is released as soon as the guard drops"]
pub struct SessionGuard<'a> {
    locks: &'a SessionLocks,
    session_id: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
}

impl SessionLocks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `session_id`.
    pub async fn acquire(&self, session_id: Uuid) -> SessionGuard<'_> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(|p| p.into_inner());
            Arc::clone(slots.entry(session_id).or_default())
        };
        let guard = slot.lock_owned().await;
        SessionGuard {
            locks: self,
            session_id,
            guard: Some(guard),
        }
    }

    /// Returns the number of sessions currently held or waited on.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    /// Returns `true` when no session is held or waited on.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn release(&self, session_id: Uuid) {
        let mut slots = self.slots.lock().unwrap_or_else(|p| p.into_inner());
        // The map's own handle is the last one: no holder, no waiter.
        if slots
            .get(&session_id)
            .is_some_and(|slot| Arc::strong_count(slot) == 1)
        {
            slots.remove(&session_id);
        }
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks.release(self.session_id);
    }
}
