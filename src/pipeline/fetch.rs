// src/pipeline/fetch.rs

//! Offer fetcher stage.
//!
//! One worker per region pages through the listing API. All workers share a
//! single output channel that closes once every worker has finished.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::mpsc;

use crate::models::{ListingSort, PageRequest, RawListing, Region};
use crate::services::ListingApi;

use super::HANDOFF;
use super::errors::{ErrorSink, Stage};

/// Fetch every listing of every incoming region.
pub fn fetch_offers(
    api: Arc<dyn ListingApi>,
    mut regions: mpsc::Receiver<Region>,
    page_size: u32,
    errors: ErrorSink,
) -> mpsc::Receiver<RawListing> {
    let (tx, rx) = mpsc::channel(HANDOFF);

    tokio::spawn(async move {
        let mut workers = Vec::new();

        while let Some(region) = regions.recv().await {
            let api = Arc::clone(&api);
            let tx = tx.clone();
            let errors = errors.clone();

            workers.push(tokio::spawn(async move {
                fetch_region(&*api, region, page_size, &tx, &errors).await;
            }));
        }

        for result in join_all(workers).await {
            if let Err(e) = result {
                log::error!("Region worker failed: {}", e);
            }
        }
    });

    rx
}

/// Page through one region, handing off every listing before asking for the
/// next page. Stops at the first error, an empty page, or a missing next link.
async fn fetch_region(
    api: &dyn ListingApi,
    region: Region,
    page_size: u32,
    out: &mpsc::Sender<RawListing>,
    errors: &ErrorSink,
) {
    log::debug!("Fetching offers for region {}", region);

    let request = PageRequest {
        region,
        page_size,
        sort: ListingSort::CreateDate,
    };

    let mut page = match api.first_page(&request).await {
        Ok(page) => page,
        Err(e) => {
            errors.report(Stage::Fetch, e);
            return;
        }
    };

    while !page.results.is_empty() {
        log::debug!(
            "Region {}: page {} with {} offers",
            region,
            page.page,
            page.results.len()
        );

        for listing in page.results.drain(..) {
            if out.send(listing).await.is_err() {
                return;
            }
        }

        if page.next_link().is_none() {
            break;
        }

        page = match api.next_page(&page).await {
            Ok(next) => next,
            Err(e) => {
                errors.report(Stage::Fetch, e);
                return;
            }
        };
    }

    log::debug!("Region {} done", region);
}
