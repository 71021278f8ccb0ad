//! User service module
//!
//! Account registration with transactional outbox delivery of the
//! `user.created` event, account verification and user lookups.

mod service;

#[cfg(test)]
mod tests;

pub use service::UserService;
