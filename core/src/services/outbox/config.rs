//! Configuration for the outbox relay

use std::time::Duration;

use acct_shared::EventsConfig;

#[derive(Debug, Clone)]
pub struct OutboxRelayConfig {
    /// Rows fetched per pass
    pub batch_size: u32,
    /// Failed attempts after which a row is no longer retried
    pub max_attempts: u32,
    /// Pause between passes in [`OutboxRelay::run`](super::OutboxRelay::run)
    pub poll_interval: Duration,
}

impl Default for OutboxRelayConfig {
    fn default() -> Self {
        Self {
            batch_size: 50,
            max_attempts: 10,
            poll_interval: Duration::from_secs(5),
        }
    }
}

impl From<&EventsConfig> for OutboxRelayConfig {
    fn from(config: &EventsConfig) -> Self {
        Self {
            batch_size: config.outbox_batch_size,
            max_attempts: config.outbox_max_attempts,
            poll_interval: Duration::from_secs(config.outbox_poll_interval_secs),
        }
    }
}
