//! Persistence sink stage.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::models::Offer;
use crate::storage::OfferStore;

use super::RunStats;
use super::errors::{ErrorSink, Stage};

/// Save every notified offer, then report completion exactly once.
pub fn persist_offers(
    store: Arc<dyn OfferStore>,
    mut offers: mpsc::Receiver<Offer>,
    errors: ErrorSink,
    done: oneshot::Sender<RunStats>,
) {
    tokio::spawn(async move {
        let mut stats = RunStats::default();

        while let Some(offer) = offers.recv().await {
            log::debug!("Persisting offer {}", offer.id);
            match store.save(&offer).await {
                Ok(()) => stats.persisted += 1,
                Err(e) => {
                    stats.persist_failures += 1;
                    errors.report(Stage::Persist, e);
                }
            }
        }

        if done.send(stats).is_err() {
            log::warn!("Nobody is waiting for pipeline completion");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::errors;
    use crate::pipeline::testing::{FailingStore, offer};
    use crate::storage::{EngineStore, MemoryEngine};

    #[tokio::test]
    async fn test_saves_and_reports_completion() {
        let store = Arc::new(EngineStore::new(Arc::new(MemoryEngine::new())));
        let (tx, rx) = mpsc::channel(4);
        let (sink, _error_rx) = errors::channel();
        let (done_tx, done_rx) = oneshot::channel();

        tx.send(offer(1, 10, 10)).await.unwrap();
        tx.send(offer(2, 10, 10)).await.unwrap();
        drop(tx);
        persist_offers(store.clone(), rx, sink, done_tx);

        let stats = done_rx.await.unwrap();
        assert_eq!(stats.persisted, 2);
        assert!(store.exists(1).await.unwrap());
        assert!(store.exists(2).await.unwrap());
    }

    #[tokio::test]
    async fn test_failures_counted_and_reported() {
        let (tx, rx) = mpsc::channel(4);
        let (sink, mut error_rx) = errors::channel();
        let (done_tx, done_rx) = oneshot::channel();

        tx.send(offer(1, 10, 10)).await.unwrap();
        drop(tx);
        persist_offers(Arc::new(FailingStore), rx, sink, done_tx);

        let stats = done_rx.await.unwrap();
        assert_eq!(stats.persisted, 0);
        assert_eq!(stats.persist_failures, 1);
        assert_eq!(error_rx.recv().await.unwrap().stage, Stage::Persist);
    }

    #[tokio::test]
    async fn test_empty_input_still_completes() {
        let (tx, rx) = mpsc::channel::<Offer>(1);
        let (sink, _error_rx) = errors::channel();
        let (done_tx, done_rx) = oneshot::channel();
        drop(tx);

        persist_offers(Arc::new(FailingStore), rx, sink, done_tx);
        assert_eq!(done_rx.await.unwrap(), RunStats::default());
    }
}
