//! Delivery of outbox rows to the event transport

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

use crate::context::RequestContext;
use crate::domain::entities::OutboxEvent;
use crate::errors::{AppError, AppResult};
use crate::events::{EventPublisher, PublishError};
use crate::repositories::OutboxRepository;

use super::config::OutboxRelayConfig;

/// Counts from one pass over pending rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayReport {
    pub published: usize,
    pub failed: usize,
}

/// Publishes outbox rows and records the outcome of each attempt.
///
/// Delivery is at least once: a row whose publish succeeded but whose
/// `mark_published` failed is sent again on a later pass.
pub struct OutboxRelay<O, P>
where
    O: OutboxRepository,
    P: EventPublisher,
{
    outbox: Arc<O>,
    publisher: Arc<P>,
    config: OutboxRelayConfig,
}

impl<O, P> OutboxRelay<O, P>
where
    O: OutboxRepository,
    P: EventPublisher,
{
    pub fn new(outbox: Arc<O>, publisher: Arc<P>, config: OutboxRelayConfig) -> Self {
        Self {
            outbox,
            publisher,
            config,
        }
    }

    /// Publish one row and record the result
    #[instrument(skip(self, ctx, event), fields(request_id = %ctx.request_id(), event_id = %event.id, topic = %event.topic))]
    pub async fn deliver(&self, ctx: &RequestContext, event: &OutboxEvent) -> Result<(), PublishError> {
        let published = ctx
            .bounded(self.publisher.publish(&event.topic, &event.key, &event.payload))
            .await
            .unwrap_or(Err(PublishError::Timeout));

        match published {
            Ok(()) => {
                if let Err(e) = self.outbox.mark_published(event.id).await {
                    warn!(error = %e, "Event published but not marked; it will be sent again");
                }
                debug!("Event published");
                Ok(())
            }
            Err(publish_err) => {
                if let Err(e) = self.outbox.record_failure(event.id, &publish_err.to_string()).await {
                    error!(error = %e, "Failed to record publish failure");
                }
                warn!(error = %publish_err, attempts = event.attempts + 1, "Event publish failed");
                Err(publish_err)
            }
        }
    }

    /// One pass over pending rows, oldest first
    pub async fn dispatch_pending(&self, ctx: &RequestContext) -> AppResult<RelayReport> {
        let pending = ctx
            .bounded(
                self.outbox
                    .pending(self.config.batch_size, self.config.max_attempts),
            )
            .await?
            .map_err(|e| AppError::database("get pending events", e))?;

        let mut report = RelayReport::default();
        for event in &pending {
            match self.deliver(ctx, event).await {
                Ok(()) => report.published += 1,
                Err(_) => report.failed += 1,
            }
        }
        Ok(report)
    }

    /// Run passes every `poll_interval` until `shutdown` turns true or its sender is dropped
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_secs = self.config.poll_interval.as_secs(),
            batch_size = self.config.batch_size,
            "Outbox relay started"
        );
        let mut interval = tokio::time::interval(self.config.poll_interval);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match self.dispatch_pending(&RequestContext::background()).await {
                        Ok(report) if report.published + report.failed > 0 => {
                            info!(published = report.published, failed = report.failed, "Outbox pass finished");
                        }
                        Ok(_) => {}
                        Err(e) => error!(error = %e, "Outbox pass failed"),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("Outbox relay stopped");
    }
}
