//! Event transport adapters

pub mod redis_streams;

#[cfg(test)]
mod tests;

pub use redis_streams::RedisStreamsPublisher;
