//! Database module - MySQL implementations using SQLx
//!
//! This module provides database access layer implementations including:
//! - Connection pool management and migrations
//! - Repository implementations for users and the event outbox
//! - Translation of driver errors into repository outcomes

pub mod connection;
pub mod error;
pub mod mysql;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use error::map_sqlx_error;
pub use mysql::{MySqlOutboxRepository, MySqlUserRepository};
