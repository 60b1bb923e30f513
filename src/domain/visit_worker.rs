//! Background worker persisting visit events.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info};

use crate::domain::entities::NewVisit;
use crate::domain::repositories::VisitRepository;
use crate::domain::visit_event::VisitEvent;

/// Retries after the first failed attempt.
const MAX_RETRIES: usize = 2;

/// Consumes visit events until the channel closes.
///
/// At most `concurrency` inserts are in flight at a time. Each insert gets up
/// to three attempts with jittered exponential backoff; a visit that still
/// fails is logged and dropped. Failures never reach the redirect path.
pub async fn run_visit_worker(
    mut rx: mpsc::Receiver<VisitEvent>,
    repository: Arc<dyn VisitRepository>,
    concurrency: usize,
) {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };
        let repository = repository.clone();

        tokio::spawn(async move {
            let _permit = permit;
            persist_visit(repository, event.into()).await;
        });
    }

    info!("Visit worker stopped: channel closed");
}

async fn persist_visit(repository: Arc<dyn VisitRepository>, visit: NewVisit) {
    let strategy = ExponentialBackoff::from_millis(10)
        .max_delay(Duration::from_secs(1))
        .map(jitter)
        .take(MAX_RETRIES);

    let short_code = visit.short_code.clone();
    let result = Retry::start(strategy, || {
        let repository = repository.clone();
        let visit = visit.clone();
        async move { repository.record_visit(visit).await }
    })
    .await;

    match result {
        Ok(()) => debug!(short_code = %short_code, "Visit recorded"),
        Err(e) => {
            metrics::counter!("visits_failed_total").increment(1);
            error!(short_code = %short_code, error = %e, "Failed to record visit");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockVisitRepository, StoreError};

    #[tokio::test]
    async fn test_worker_records_visits() {
        let mut repo = MockVisitRepository::new();
        repo.expect_record_visit()
            .withf(|visit| visit.short_code == "aB3dE9z")
            .times(2)
            .returning(|_| Ok(()));

        let (tx, rx) = mpsc::channel(10);
        tx.send(VisitEvent::new("aB3dE9z".to_string(), None, None, None))
            .await
            .unwrap();
        tx.send(VisitEvent::new("aB3dE9z".to_string(), None, Some("curl"), None))
            .await
            .unwrap();
        drop(tx);

        run_visit_worker(rx, Arc::new(repo), 2).await;

        // Let spawned inserts finish before the mock verifies its expectations.
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_worker_retries_then_gives_up() {
        let mut repo = MockVisitRepository::new();
        repo.expect_record_visit()
            .times(MAX_RETRIES + 1)
            .returning(|_| Err(StoreError::Database(sqlx::Error::PoolTimedOut)));

        let (tx, rx) = mpsc::channel(10);
        tx.send(VisitEvent::new("aB3dE9z".to_string(), None, None, None))
            .await
            .unwrap();
        drop(tx);

        run_visit_worker(rx, Arc::new(repo), 1).await;
        tokio::time::sleep(Duration::from_secs(5)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_worker_succeeds_on_retry() {
        let mut repo = MockVisitRepository::new();
        let mut seq = mockall::Sequence::new();
        repo.expect_record_visit()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(StoreError::Database(sqlx::Error::PoolTimedOut)));
        repo.expect_record_visit()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let (tx, rx) = mpsc::channel(10);
        tx.send(VisitEvent::new("aB3dE9z".to_string(), None, None, None))
            .await
            .unwrap();
        drop(tx);

        run_visit_worker(rx, Arc::new(repo), 1).await;
        tokio::time::sleep(Duration::from_secs(5)).await;
    }
}
