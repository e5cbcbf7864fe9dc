//! Aggregate repository abstraction.

use async_trait::async_trait;
use uuid::Uuid;

use crate::aggregate::Aggregate;
use crate::error::DomainError;

/// Keyed store of whole aggregates.
///
/// Every operation is atomic with respect to concurrent callers. A read
/// reflects the most recently completed write to the same aggregate.
#[async_trait]
pub trait Repository<A: Aggregate>: Send + Sync {
    /// Inserts the aggregate, overwriting any previous value with the same ID.
    async fn save(&self, aggregate: A) -> Result<(), DomainError>;

    /// Returns a snapshot of the aggregate with the given ID.
    ///
    /// Fails with `DomainError::AggregateNotFound` when absent.
    async fn find_by_id(&self, id: Uuid) -> Result<A, DomainError>;

    /// Replaces an existing aggregate.
    ///
    /// Fails with `DomainError::AggregateNotFound` when the ID is unknown;
    /// `update` never inserts.
    async fn update(&self, aggregate: A) -> Result<(), DomainError>;

    /// Removes the aggregate with the given ID.
    ///
    /// Fails with `DomainError::AggregateNotFound` when absent.
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
}
