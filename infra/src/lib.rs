//! # Infrastructure Layer
//!
//! Concrete adapters for the account service's ports:
//! - **Database**: MySQL repositories using SQLx, including the
//!   transactional registration write and the event outbox
//! - **Events**: Redis Streams publisher for account lifecycle events

pub mod database;
pub mod events;

pub use database::{DatabasePool, MySqlOutboxRepository, MySqlUserRepository, PoolStatistics};
pub use events::RedisStreamsPublisher;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failure
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Redis connection error
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Hide credentials in a connection URL before logging it
pub(crate) fn mask_url(url: &str) -> String {
    if let (Some(at_pos), Some(proto_end)) = (url.rfind('@'), url.find("://")) {
        if at_pos > proto_end {
            return format!("{}****{}", &url[..proto_end + 3], &url[at_pos..]);
        }
    }
    url.to_string()
}
