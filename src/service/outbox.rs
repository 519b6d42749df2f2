// service/outbox.rs
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::{
    db::store::MarketplaceStore,
    models::notificationmodel::NewNotification,
};

#[derive(Debug)]
struct OutboxEntry {
    notification: NewNotification,
    attempts: u32,
}

/// Result of one delivery pass. `deferred` messages went back to the queue
/// for the worker; `dropped` ones exhausted the worker's retries too.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub deferred: usize,
    pub dropped: usize,
}

enum Attempt {
    Delivered,
    Failed(OutboxEntry),
}

/// Post-commit notification delivery. Each message is retried on its own, so
/// a failing recipient never holds back or cancels the others. A message
/// that fails inline is queued and gets a second round of attempts from the
/// worker before it is dropped.
#[derive(Debug)]
pub struct NotificationOutbox {
    store: Arc<dyn MarketplaceStore>,
    queue: Mutex<VecDeque<OutboxEntry>>,
    max_attempts: u32,
    retry_backoff: Duration,
}

impl NotificationOutbox {
    pub fn new(store: Arc<dyn MarketplaceStore>, max_attempts: u32, retry_backoff: Duration) -> Self {
        Self {
            store,
            queue: Mutex::new(VecDeque::new()),
            max_attempts: max_attempts.max(1),
            retry_backoff,
        }
    }

    /// Delivers the caller's batch inline. The report covers only this batch.
    pub async fn dispatch(&self, batch: Vec<NewNotification>) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        let mut failed = Vec::new();

        for notification in batch {
            let entry = OutboxEntry { notification, attempts: 0 };
            match self.attempt(entry).await {
                Attempt::Delivered => report.delivered += 1,
                Attempt::Failed(mut entry) => {
                    tracing::warn!(
                        "Notification {} for {} deferred to the outbox worker after {} attempt(s)",
                        entry.notification.kind.to_str(),
                        entry.notification.user_id,
                        entry.attempts
                    );
                    entry.attempts = 0;
                    failed.push(entry);
                    report.deferred += 1;
                }
            }
        }

        if !failed.is_empty() {
            self.queue.lock().await.extend(failed);
        }
        report
    }

    pub async fn pending(&self) -> usize {
        self.queue.lock().await.len()
    }

    /// Retries what was queued before the call. Entries that fail again are
    /// dropped.
    pub async fn flush(&self) -> DeliveryReport {
        let entries: Vec<OutboxEntry> = self.queue.lock().await.drain(..).collect();
        let mut report = DeliveryReport::default();

        for entry in entries {
            match self.attempt(entry).await {
                Attempt::Delivered => report.delivered += 1,
                Attempt::Failed(entry) => {
                    tracing::error!(
                        "Dropping notification {} for {} after {} worker attempt(s)",
                        entry.notification.kind.to_str(),
                        entry.notification.user_id,
                        entry.attempts
                    );
                    report.dropped += 1;
                }
            }
        }
        report
    }

    async fn attempt(&self, mut entry: OutboxEntry) -> Attempt {
        loop {
            entry.attempts += 1;
            match self.store.store_notification(entry.notification.clone()).await {
                Ok(stored) => {
                    tracing::debug!(
                        "Notification {} ({}) delivered to {} after {} attempt(s)",
                        stored.id,
                        stored.kind.to_str(),
                        stored.user_id,
                        entry.attempts
                    );
                    return Attempt::Delivered;
                }
                Err(e) if entry.attempts < self.max_attempts => {
                    tracing::warn!(
                        "Notification {} for {} failed (attempt {}/{}): {}",
                        entry.notification.kind.to_str(),
                        entry.notification.user_id,
                        entry.attempts,
                        self.max_attempts,
                        e
                    );
                    if !self.retry_backoff.is_zero() {
                        tokio::time::sleep(self.retry_backoff * entry.attempts).await;
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        "Notification {} for {} failed on final attempt {}: {}",
                        entry.notification.kind.to_str(),
                        entry.notification.user_id,
                        entry.attempts,
                        e
                    );
                    return Attempt::Failed(entry);
                }
            }
        }
    }
}

/// Retries deferred notifications on a fixed interval.
pub async fn start_outbox_worker(outbox: Arc<NotificationOutbox>, every: Duration) {
    let mut interval = tokio::time::interval(every);

    loop {
        interval.tick().await;

        if outbox.pending().await == 0 {
            continue;
        }

        let report = outbox.flush().await;
        tracing::info!(
            "Outbox worker flushed: {} delivered, {} dropped",
            report.delivered,
            report.dropped
        );
    }
}
