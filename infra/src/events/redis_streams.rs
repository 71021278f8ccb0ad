//! Redis Streams-backed event publisher.
//!
//! Each topic maps to one stream key. Every message is appended with XADD
//! and carries two fields: `key` (the partition key, the user id for
//! account events) and `payload` (the serialized envelope). Streams are
//! capped with an approximate `MAXLEN` trim.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{Client, RedisError};
use tracing::{debug, info, instrument};

use acct_core::events::{EventPublisher, PublishError};
use acct_shared::EventsConfig;

use crate::{mask_url, InfrastructureError};

/// Publishes events to Redis Streams over a multiplexed connection
#[derive(Clone)]
pub struct RedisStreamsPublisher {
    /// Shared connection; clones multiplex onto the same socket
    connection: MultiplexedConnection,
    /// Approximate upper bound on entries kept per stream
    max_len: usize,
}

impl RedisStreamsPublisher {
    /// Connect to Redis
    ///
    /// # Arguments
    /// * `config` - Event transport settings
    ///
    /// # Returns
    /// * `Result<Self, InfrastructureError>` - Connected publisher or error
    pub async fn connect(config: &EventsConfig) -> Result<Self, InfrastructureError> {
        info!(url = %mask_url(&config.redis_url), "Connecting event publisher to Redis");

        let client = Client::open(config.redis_url.as_str())?;
        let connection = client.get_multiplexed_async_connection().await?;

        Ok(Self {
            connection,
            max_len: config.stream_maxlen,
        })
    }

    /// Check the connection with PING
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let mut connection = self.connection.clone();
        let pong: String = redis::cmd("PING").query_async(&mut connection).await?;
        Ok(pong == "PONG")
    }
}

/// Build the XADD command for one message
pub(crate) fn xadd_command(topic: &str, key: &[u8], payload: &[u8], max_len: usize) -> redis::Cmd {
    let mut cmd = redis::cmd("XADD");
    cmd.arg(topic);
    if max_len > 0 {
        cmd.arg("MAXLEN").arg("~").arg(max_len);
    }
    cmd.arg("*").arg("key").arg(key).arg("payload").arg(payload);
    cmd
}

pub(crate) fn publish_error(err: RedisError) -> PublishError {
    if err.is_timeout() {
        PublishError::Timeout
    } else {
        PublishError::Transport(format!("XADD failed: {}", err))
    }
}

#[async_trait]
impl EventPublisher for RedisStreamsPublisher {
    #[instrument(skip(self, key, payload), fields(payload_len = payload.len()))]
    async fn publish(&self, topic: &str, key: &[u8], payload: &[u8]) -> Result<(), PublishError> {
        let mut connection = self.connection.clone();

        let entry_id: String = xadd_command(topic, key, payload, self.max_len)
            .query_async(&mut connection)
            .await
            .map_err(publish_error)?;

        debug!(entry_id = %entry_id, "Event appended to stream");
        Ok(())
    }
}
