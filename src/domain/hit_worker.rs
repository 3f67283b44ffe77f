//! Background worker that settles durable hit counts.
//!
//! Consumes [`HitEvent`]s queued by the redirect workflow and applies them
//! to the durable store with [`LinkRepository::increment_hits`]. Running
//! this off the request path keeps redirect latency flat: the caller has
//! already received its response by the time the increment lands.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_retry::{strategy::FixedInterval, Retry};
use tracing::{debug, error};

use crate::domain::hit_event::HitEvent;
use crate::domain::repositories::LinkRepository;

/// Delay between increment retries.
const RETRY_INTERVAL_MS: u64 = 200;

/// Extra attempts after the first failure. Bounded so a dead database
/// cannot pile up stalled tasks.
const RETRY_ATTEMPTS: usize = 2;

/// Runs until the sending side of the channel is dropped.
///
/// Each event is applied with a short fixed-interval retry. A failed
/// increment is logged and dropped — the redirect it belongs to has already
/// completed, so there is nobody left to report the error to.
pub async fn run_hit_worker(mut rx: mpsc::Receiver<HitEvent>, links: Arc<dyn LinkRepository>) {
    while let Some(event) = rx.recv().await {
        let strategy = FixedInterval::from_millis(RETRY_INTERVAL_MS).take(RETRY_ATTEMPTS);

        match Retry::spawn(strategy, || links.increment_hits(&event.short_id)).await {
            Ok(count) => {
                metrics::counter!("snaplink_hits_persisted_total").increment(1);
                debug!("Persisted hit for {}: total {}", event.short_id, count);
            }
            Err(e) => {
                metrics::counter!("snaplink_hits_dropped_total").increment(1);
                error!("Failed to persist hit for {}: {}", event.short_id, e);
            }
        }
    }

    debug!("Hit worker shutting down: channel closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::error::AppError;
    use mockall::predicate::eq;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_worker_increments_for_each_event() {
        let mut repo = MockLinkRepository::new();
        repo.expect_increment_hits()
            .with(eq("aaaaaaa"))
            .times(3)
            .returning(|_| Ok(1));

        let (tx, rx) = mpsc::channel(16);
        let worker = tokio::spawn(run_hit_worker(rx, Arc::new(repo)));

        for _ in 0..3 {
            tx.send(HitEvent::new("aaaaaaa")).await.unwrap();
        }
        drop(tx);

        worker.await.unwrap();
    }

    #[tokio::test]
    async fn test_worker_retries_transient_failures() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();

        let mut repo = MockLinkRepository::new();
        repo.expect_increment_hits().times(2).returning(move |_| {
            if calls_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(AppError::internal("Database error", json!({})))
            } else {
                Ok(5)
            }
        });

        let (tx, rx) = mpsc::channel(16);
        let worker = tokio::spawn(run_hit_worker(rx, Arc::new(repo)));

        tx.send(HitEvent::new("bbbbbbb")).await.unwrap();
        drop(tx);

        worker.await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_worker_drops_event_after_retries_exhaust() {
        let mut repo = MockLinkRepository::new();
        repo.expect_increment_hits()
            .times(1 + RETRY_ATTEMPTS)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let (tx, rx) = mpsc::channel(16);
        let worker = tokio::spawn(run_hit_worker(rx, Arc::new(repo)));

        tx.send(HitEvent::new("ccccccc")).await.unwrap();
        drop(tx);

        // Worker must survive the failure and exit cleanly on close.
        worker.await.unwrap();
    }
}
