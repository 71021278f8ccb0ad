//! Event transport and outbox relay configuration

use serde::{Deserialize, Serialize};

use super::env_or;

/// Redis Streams transport and outbox relay settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventsConfig {
    /// Redis connection URL
    pub redis_url: String,

    /// Approximate maximum stream length passed to `XADD MAXLEN ~` (0 = unbounded)
    #[serde(default)]
    pub stream_maxlen: usize,

    /// Seconds between relay passes over pending outbox rows
    pub outbox_poll_interval_secs: u64,

    /// Rows fetched per relay pass
    pub outbox_batch_size: u32,

    /// Publish attempts before a row is left for manual inspection
    pub outbox_max_attempts: u32,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            redis_url: String::from("redis://127.0.0.1:6379"),
            stream_maxlen: 100_000,
            outbox_poll_interval_secs: 5,
            outbox_batch_size: 50,
            outbox_max_attempts: 10,
        }
    }
}

impl EventsConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            redis_url: std::env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            stream_maxlen: env_or("EVENT_STREAM_MAXLEN", defaults.stream_maxlen),
            outbox_poll_interval_secs: env_or(
                "OUTBOX_POLL_INTERVAL_SECS",
                defaults.outbox_poll_interval_secs,
            ),
            outbox_batch_size: env_or("OUTBOX_BATCH_SIZE", defaults.outbox_batch_size),
            outbox_max_attempts: env_or("OUTBOX_MAX_ATTEMPTS", defaults.outbox_max_attempts),
        }
    }
}
