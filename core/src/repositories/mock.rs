//! In-memory implementation of the repositories for testing

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{OutboxEvent, User, UserPremise};
use crate::errors::{ConstraintKind, RepositoryError, RepositoryResult};

use super::outbox::OutboxRepository;
use super::user::{Registration, UserRepository};

#[derive(Default)]
struct State {
    users: HashMap<Uuid, User>,
    premises: Vec<UserPremise>,
    outbox: Vec<OutboxEvent>,
}

/// Shared in-memory store backing both [`UserRepository`] and [`OutboxRepository`].
///
/// Clones share the same data. Failures and latency can be injected per
/// operation name (`"register"`, `"find_by_id"`, `"find_by_email"`, `"list"`,
/// `"count"`, `"update"`, `"pending"`, `"mark_published"`, `"record_failure"`).
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<RwLock<State>>,
    known_premises: Arc<Mutex<Option<HashSet<Uuid>>>>,
    failures: Arc<Mutex<HashMap<&'static str, RepositoryError>>>,
    latency: Arc<Mutex<Option<Duration>>>,
    calls: Arc<Mutex<Vec<&'static str>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict associations to these premise ids; others fail like a foreign key would
    pub fn with_premises(self, premises: impl IntoIterator<Item = Uuid>) -> Self {
        if let Ok(mut known) = self.known_premises.lock() {
            *known = Some(premises.into_iter().collect());
        }
        self
    }

    /// Make every call to `operation` fail with `error` until cleared
    pub fn fail_on(&self, operation: &'static str, error: RepositoryError) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.insert(operation, error);
        }
    }

    pub fn clear_failures(&self) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.clear();
        }
    }

    /// Delay every call by `latency`
    pub fn set_latency(&self, latency: Duration) {
        if let Ok(mut current) = self.latency.lock() {
            *current = Some(latency);
        }
    }

    /// Operation names in call order
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Insert a user directly, bypassing `register`
    pub async fn insert_user(&self, user: User) {
        self.state.write().await.users.insert(user.id, user);
    }

    pub async fn users(&self) -> Vec<User> {
        self.state.read().await.users.values().cloned().collect()
    }

    pub async fn premises(&self) -> Vec<UserPremise> {
        self.state.read().await.premises.clone()
    }

    pub async fn outbox(&self) -> Vec<OutboxEvent> {
        self.state.read().await.outbox.clone()
    }

    async fn enter(&self, operation: &'static str) -> RepositoryResult<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(operation);
        }
        let latency = self.latency.lock().ok().and_then(|latency| *latency);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        let failure = self
            .failures
            .lock()
            .ok()
            .and_then(|failures| failures.get(operation).cloned());
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn premise_known(&self, premise_id: Uuid) -> bool {
        match self.known_premises.lock() {
            Ok(known) => known.as_ref().map_or(true, |ids| ids.contains(&premise_id)),
            Err(_) => true,
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn register(&self, registration: Registration) -> RepositoryResult<User> {
        self.enter("register").await?;
        let Registration {
            user,
            premise,
            event,
        } = registration;

        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::conflict("users.email"));
        }
        if let Some(premise) = &premise {
            if !self.premise_known(premise.premise_id) {
                return Err(RepositoryError::violation(
                    ConstraintKind::ForeignKey,
                    Some("user_premises.premise_id".to_string()),
                ));
            }
        }

        state.users.insert(user.id, user.clone());
        if let Some(premise) = premise {
            let exists = state
                .premises
                .iter()
                .any(|p| p.user_id == premise.user_id && p.premise_id == premise.premise_id);
            if !exists {
                state.premises.push(premise);
            }
        }
        state.outbox.push(event);
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        self.enter("find_by_id").await?;
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        self.enter("find_by_email").await?;
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self, offset: u64, limit: u32) -> RepositoryResult<Vec<User>> {
        self.enter("list").await?;
        let state = self.state.read().await;
        let mut users: Vec<User> = state.users.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(users
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(limit as usize)
            .collect())
    }

    async fn count(&self) -> RepositoryResult<u64> {
        self.enter("count").await?;
        Ok(self.state.read().await.users.len() as u64)
    }

    async fn update(&self, user: User) -> RepositoryResult<User> {
        self.enter("update").await?;
        let mut state = self.state.write().await;
        match state.users.get_mut(&user.id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(user)
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}

#[async_trait]
impl OutboxRepository for InMemoryRepository {
    async fn pending(&self, limit: u32, max_attempts: u32) -> RepositoryResult<Vec<OutboxEvent>> {
        self.enter("pending").await?;
        let state = self.state.read().await;
        let mut pending: Vec<OutboxEvent> = state
            .outbox
            .iter()
            .filter(|e| !e.is_published() && e.attempts < max_attempts)
            .cloned()
            .collect();
        pending.sort_by_key(|e| e.created_at);
        pending.truncate(limit as usize);
        Ok(pending)
    }

    async fn mark_published(&self, id: Uuid) -> RepositoryResult<()> {
        self.enter("mark_published").await?;
        let mut state = self.state.write().await;
        let event = state
            .outbox
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(RepositoryError::NotFound)?;
        event.published_at = Some(Utc::now());
        Ok(())
    }

    async fn record_failure(&self, id: Uuid, error: &str) -> RepositoryResult<()> {
        self.enter("record_failure").await?;
        let mut state = self.state.write().await;
        let event = state
            .outbox
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(RepositoryError::NotFound)?;
        event.attempts += 1;
        event.last_error = Some(error.to_string());
        Ok(())
    }
}
