//! Event publishing port.
//!
//! The core hands serialized envelopes to an [`EventPublisher`] and never
//! talks to a broker directly.

use async_trait::async_trait;
use thiserror::Error;

#[cfg(any(test, feature = "testing"))]
pub mod mock;

#[cfg(any(test, feature = "testing"))]
pub use mock::RecordingPublisher;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    #[error("failed to encode event: {0}")]
    Serialization(String),

    #[error("event transport failed: {0}")]
    Transport(String),

    #[error("event publish timed out")]
    Timeout,
}

/// Sends keyed byte payloads to a topic.
///
/// `Ok` means the transport acknowledged the message.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, topic: &str, key: &[u8], payload: &[u8]) -> Result<(), PublishError>;
}
