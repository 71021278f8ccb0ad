//! Domain events published when account state changes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::entities::OutboxEvent;

/// Topic for accounts that were just registered
pub const USER_CREATED: &str = "user.created";

/// Tagged event payload: `{"type": "...", "payload": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    #[serde(rename = "type")]
    pub event_type: String,

    pub payload: Map<String, Value>,
}

impl EventEnvelope {
    pub fn new(event_type: impl Into<String>, payload: Map<String, Value>) -> Self {
        Self {
            event_type: event_type.into(),
            payload,
        }
    }

    /// `user.created` carrying the verification token and the account email
    pub fn user_created(token: &str, email: &str) -> Self {
        let mut payload = Map::new();
        payload.insert("token".to_string(), Value::from(token));
        payload.insert("email".to_string(), Value::from(email));
        Self::new(USER_CREATED, payload)
    }

    /// Serializes the envelope into an outbox row keyed by `key`.
    ///
    /// The topic is the event type.
    pub fn into_outbox(self, key: Uuid) -> Result<OutboxEvent, serde_json::Error> {
        let payload = serde_json::to_vec(&self)?;
        Ok(OutboxEvent::new(
            self.event_type,
            key.to_string().into_bytes(),
            payload,
        ))
    }
}
