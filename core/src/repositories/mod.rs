pub mod outbox;
pub mod user;

#[cfg(any(test, feature = "testing"))]
pub mod mock;

pub use outbox::OutboxRepository;
pub use user::{Registration, UserRepository};

#[cfg(any(test, feature = "testing"))]
pub use mock::InMemoryRepository;
