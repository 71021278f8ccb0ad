//! Per-request context handed to every workflow operation.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use uuid::Uuid;

/// The request deadline passed before the awaited call finished
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("request deadline exceeded")]
pub struct DeadlineExceeded;

/// Correlation id plus an optional deadline for one inbound request.
///
/// Workflows record the request id on their tracing spans and wrap every
/// repository and publisher call in [`RequestContext::bounded`], so a call
/// still pending at the deadline is dropped instead of hanging.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    deadline: Option<Instant>,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            deadline: None,
        }
    }

    /// Context with a fresh request id and no deadline, for work not tied to a request
    pub fn background() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Await `fut`, giving up once the deadline passes
    pub async fn bounded<F>(&self, fut: F) -> Result<F::Output, DeadlineExceeded>
    where
        F: Future,
    {
        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, fut)
                .await
                .map_err(|_| DeadlineExceeded),
            None => Ok(fut.await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_bounded_times_out() {
        let ctx = RequestContext::new("req-1").with_timeout(Duration::from_millis(50));
        let result = ctx
            .bounded(tokio::time::sleep(Duration::from_secs(1)))
            .await;
        assert_eq!(result, Err(DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_bounded_without_deadline() {
        let ctx = RequestContext::new("req-2");
        assert_eq!(ctx.bounded(async { 7 }).await, Ok(7));
        assert_eq!(ctx.request_id(), "req-2");
    }
}
