// src/pipeline/classify.rs

//! Change classifier stage.
//!
//! Looks up each offer in the store and routes it to the branch matching its
//! [`Change`]. Unchanged offers stop here.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::models::{Change, Offer};
use crate::storage::OfferStore;

use super::HANDOFF;
use super::errors::{ErrorSink, Stage};

/// Output branches of the classifier.
pub struct Branches {
    pub new: mpsc::Receiver<Offer>,
    pub rise: mpsc::Receiver<Offer>,
    pub drop: mpsc::Receiver<Offer>,
}

/// Classify every incoming offer against its stored state.
///
/// All three branches close together when the input closes.
pub fn classify_offers(
    store: Arc<dyn OfferStore>,
    mut offers: mpsc::Receiver<Offer>,
    errors: ErrorSink,
) -> Branches {
    let (new_tx, new_rx) = mpsc::channel(HANDOFF);
    let (rise_tx, rise_rx) = mpsc::channel(HANDOFF);
    let (drop_tx, drop_rx) = mpsc::channel(HANDOFF);

    tokio::spawn(async move {
        while let Some(offer) = offers.recv().await {
            let stored = match store.get(offer.id).await {
                Ok(stored) => Some(stored),
                Err(e) if e.is_not_found() => None,
                Err(e) => {
                    errors.report(Stage::Classify, e);
                    continue;
                }
            };

            let change = Change::between(stored.as_ref(), &offer);
            log::debug!("Offer {} classified as {}", offer.id, change);

            let branch = match change {
                Change::New => &new_tx,
                Change::PriceRise => &rise_tx,
                Change::PriceDrop => &drop_tx,
                Change::Unchanged => continue,
            };

            if branch.send(offer).await.is_err() {
                log::warn!("{} branch closed, stopping classifier", change);
                break;
            }
        }
    });

    Branches {
        new: new_rx,
        rise: rise_rx,
        drop: drop_rx,
    }
}
