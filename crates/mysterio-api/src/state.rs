//! Shared application state.

use std::sync::Arc;

use mysterio_core::clock::{Clock, SystemClock};
use mysterio_core::repository::Repository;
use mysterio_scenario::ScenarioSource;
use mysterio_session::application::locks::SessionLocks;
use mysterio_session::domain::aggregates::GameSession;
use mysterio_store::InMemoryRepository;
use tokio_util::sync::CancellationToken;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Clock used to stamp new sessions.
    pub clock: Arc<dyn Clock>,
    /// Session store.
    pub sessions: Arc<dyn Repository<GameSession>>,
    /// Per-session mutual exclusion for mutating handlers.
    pub locks: Arc<SessionLocks>,
    /// Time-boxed, validated scenario generation.
    pub scenarios: Arc<ScenarioSource>,
    /// Fired on server shutdown. In-flight generations are cancelled with it.
    pub shutdown: CancellationToken,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("scenarios", &self.scenarios)
            .field("shutdown", &self.shutdown)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        sessions: Arc<dyn Repository<GameSession>>,
        scenarios: ScenarioSource,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            clock,
            sessions,
            locks: Arc::new(SessionLocks::new()),
            scenarios: Arc::new(scenarios),
            shutdown,
        }
    }

    /// State backed by the in-memory store and the system clock.
    #[must_use]
    pub fn in_memory(scenarios: ScenarioSource, shutdown: CancellationToken) -> Self {
        Self::new(
            Arc::new(SystemClock),
            Arc::new(InMemoryRepository::<GameSession>::new()),
            scenarios,
            shutdown,
        )
    }
}
