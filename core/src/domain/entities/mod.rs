//! Domain entities representing core business objects.

pub mod outbox;
pub mod token;
pub mod user;
pub mod user_premise;

// Re-export commonly used types
pub use outbox::OutboxEvent;
pub use token::{Claims, TOKEN_LIFETIME_HOURS};
pub use user::{Role, User};
pub use user_premise::UserPremise;
