//! Outbox records for events awaiting delivery.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An event written in the same transaction as the state change it announces
/// and delivered to the transport afterwards, possibly more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboxEvent {
    pub id: Uuid,

    /// Destination topic or stream
    pub topic: String,

    /// Partition/ordering key
    pub key: Vec<u8>,

    /// Serialized envelope
    pub payload: Vec<u8>,

    /// Failed delivery attempts so far
    pub attempts: u32,

    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

impl OutboxEvent {
    pub fn new(topic: impl Into<String>, key: Vec<u8>, payload: Vec<u8>) -> Self {
        Self {
            id: Uuid::new_v4(),
            topic: topic.into(),
            key,
            payload,
            attempts: 0,
            last_error: None,
            created_at: Utc::now(),
            published_at: None,
        }
    }

    pub fn is_published(&self) -> bool {
        self.published_at.is_some()
    }
}
