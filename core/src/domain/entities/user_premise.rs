//! Association between a user and a premise.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPremise {
    pub id: Uuid,
    pub user_id: Uuid,
    pub premise_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserPremise {
    pub fn new(user_id: Uuid, premise_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            premise_id,
            created_at: now,
            updated_at: now,
        }
    }
}
