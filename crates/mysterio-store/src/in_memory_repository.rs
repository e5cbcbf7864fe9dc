//! In-memory implementation of the `Repository` trait.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::trace;
use uuid::Uuid;

use mysterio_core::aggregate::Aggregate;
use mysterio_core::error::DomainError;
use mysterio_core::repository::Repository;

/// Keyed aggregate store living for the lifetime of the process.
///
/// A single reader/writer lock guards the whole map: lookups run in
/// parallel, writes are exclusive. Values are cloned in and out, so a caller
/// never holds a reference into the map across an `.await`.
pub struct InMemoryRepository<A> {
    aggregates: RwLock<HashMap<Uuid, A>>,
}

impl<A> InMemoryRepository<A> {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            aggregates: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored aggregates.
    pub async fn len(&self) -> usize {
        self.aggregates.read().await.len()
    }

    /// Returns `true` if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.aggregates.read().await.is_empty()
    }
}

impl<A> Default for InMemoryRepository<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for InMemoryRepository<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryRepository").finish_non_exhaustive()
    }
}

#[async_trait]
impl<A: Aggregate> Repository<A> for InMemoryRepository<A> {
    async fn save(&self, aggregate: A) -> Result<(), DomainError> {
        let id = aggregate.aggregate_id();
        self.aggregates.write().await.insert(id, aggregate);
        trace!(%id, "aggregate saved");
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<A, DomainError> {
        self.aggregates
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(DomainError::AggregateNotFound(id))
    }

    async fn update(&self, aggregate: A) -> Result<(), DomainError> {
        let id = aggregate.aggregate_id();
        let mut aggregates = self.aggregates.write().await;
        match aggregates.get_mut(&id) {
            Some(slot) => {
                *slot = aggregate;
                trace!(%id, "aggregate updated");
                Ok(())
            }
            None => Err(DomainError::AggregateNotFound(id)),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        match self.aggregates.write().await.remove(&id) {
            Some(_) => {
                trace!(%id, "aggregate deleted");
                Ok(())
            }
            None => Err(DomainError::AggregateNotFound(id)),
        }
    }
}
