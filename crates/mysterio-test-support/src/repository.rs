//! Mock `Repository` implementations for tests.

use async_trait::async_trait;
use mysterio_core::aggregate::Aggregate;
use mysterio_core::error::DomainError;
use mysterio_core::repository::Repository;
use uuid::Uuid;

/// A repository that fails every operation with an infrastructure error.
/// Useful for testing error-handling paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingRepository;

#[async_trait]
impl<A: Aggregate> Repository<A> for FailingRepository {
    async fn save(&self, _aggregate: A) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<A, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn update(&self, _aggregate: A) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn delete(&self, _id: Uuid) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
