//! Outbox relay delivering recorded events to the publisher.

mod config;
mod relay;


pub use config::OutboxRelayConfig;
pub use relay::{OutboxRelay, RelayReport};
