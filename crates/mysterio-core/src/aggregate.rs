//! Aggregate root abstraction.

use uuid::Uuid;

/// Trait for aggregate roots held by a [`Repository`](crate::repository::Repository).
///
/// Aggregates are stored and loaded whole; the identifier is the only thing
/// a repository needs to know about them.
pub trait Aggregate: Clone + Send + Sync + 'static {
    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid;
}
