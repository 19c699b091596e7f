//! Domain mapper stage: API listings to offers.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::models::{Offer, RawListing};
use crate::utils::Clock;

use super::HANDOFF;

/// Map every listing to an [`Offer`], stamping it with the clock's time.
pub fn map_listings(
    mut listings: mpsc::Receiver<RawListing>,
    site_url: String,
    clock: Arc<dyn Clock>,
) -> mpsc::Receiver<Offer> {
    let (tx, rx) = mpsc::channel(HANDOFF);

    tokio::spawn(async move {
        while let Some(listing) = listings.recv().await {
            log::debug!("Mapping offer {}", listing.id);
            let offer = Offer::from_listing(listing, &site_url, clock.now());
            if tx.send(offer).await.is_err() {
                break;
            }
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::{listing, test_time};
    use crate::utils::FixedClock;

    #[tokio::test]
    async fn test_maps_link_and_timestamp() {
        let (tx, rx) = mpsc::channel(1);
        let mut out = map_listings(rx, "http://site/".into(), Arc::new(FixedClock(test_time())));

        tx.send(listing(5)).await.unwrap();
        drop(tx);

        let offer = out.recv().await.unwrap();
        assert_eq!(offer.id, 5);
        assert_eq!(offer.link, "http://site/oferty/acme/offer-5-5");
        assert_eq!(offer.imported_at, test_time());
        assert!(out.recv().await.is_none());
    }
}
