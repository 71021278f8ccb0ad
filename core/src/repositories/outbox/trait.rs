//! Outbox repository trait for events awaiting delivery.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::OutboxEvent;
use crate::errors::RepositoryResult;

/// Access to outbox rows written by [`UserRepository::register`](crate::repositories::UserRepository::register)
#[async_trait]
pub trait OutboxRepository: Send + Sync {
    /// Unpublished events with fewer than `max_attempts` failures, oldest first
    async fn pending(&self, limit: u32, max_attempts: u32) -> RepositoryResult<Vec<OutboxEvent>>;

    /// Mark an event as delivered
    async fn mark_published(&self, id: Uuid) -> RepositoryResult<()>;

    /// Count a failed delivery and remember why it failed
    async fn record_failure(&self, id: Uuid, error: &str) -> RepositoryResult<()>;
}
