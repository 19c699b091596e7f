//! The offers-updates pipeline.
//!
//! ```text
//! regions ─▶ fetch ─▶ map ─▶ classify ─┬─▶ notify new ────┐
//!                                      ├─▶ notify rise ───┼─▶ merge ─▶ persist ─▶ done
//!                                      └─▶ notify drop ───┘
//! ```
//!
//! Every stage is a tokio task reading from the previous stage's channel and
//! closing its own output when its input closes. Errors from any stage go to
//! a shared [`ErrorSink`] and only drop the item at hand.

pub mod classify;
pub mod errors;
pub mod fetch;
pub mod map;
pub mod merge;
pub mod notify;
pub mod persist;
pub mod source;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::oneshot;

use crate::error::{AppError, Result};
use crate::models::{Change, Config, Region};
use crate::notify::MessageWriter;
use crate::services::{HttpImageFetcher, HttpListingApi, ImageFetcher, ListingApi};
use crate::storage::OfferStore;
use crate::utils::{Clock, SystemClock};

pub use errors::{ErrorSink, RunErrors, Stage, StageError};

/// Capacity of the channels between stages. One slot keeps every hand-off
/// close to synchronous while still letting the producer move on.
pub(crate) const HANDOFF: usize = 1;

/// Default number of offers requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Counters reported by the persistence sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub persisted: usize,
    pub persist_failures: usize,
}

/// Outcome of a run: what was persisted and everything that went wrong.
#[derive(Debug, Default)]
pub struct RunReport {
    pub stats: RunStats,
    pub errors: RunErrors,
}

impl RunReport {
    /// The stats when the run was clean, the collected errors otherwise.
    pub fn into_result(self) -> Result<RunStats> {
        if self.errors.is_empty() {
            Ok(self.stats)
        } else {
            Err(AppError::Run(self.errors))
        }
    }
}

/// Wires the pipeline stages to their collaborators.
pub struct OffersUpdates {
    api: Arc<dyn ListingApi>,
    store: Arc<dyn OfferStore>,
    writer: Arc<dyn MessageWriter>,
    images: Arc<dyn ImageFetcher>,
    clock: Arc<dyn Clock>,
    site_url: String,
    page_size: u32,
}

impl OffersUpdates {
    pub fn new(
        api: Arc<dyn ListingApi>,
        store: Arc<dyn OfferStore>,
        writer: Arc<dyn MessageWriter>,
        images: Arc<dyn ImageFetcher>,
        site_url: impl Into<String>,
    ) -> Self {
        Self {
            api,
            store,
            writer,
            images,
            clock: Arc::new(SystemClock),
            site_url: site_url.into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Build the HTTP-backed pipeline described by `config`.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let client = crate::utils::http::create_async_client(&config.api)?;
        let store = crate::storage::from_config(&config.storage).await?;
        let writer = crate::notify::from_config(&config.telegram)?;

        let api = HttpListingApi::new(client.clone(), config.api.base_url.clone());
        let pipeline = Self::new(
            Arc::new(api),
            store,
            writer,
            Arc::new(HttpImageFetcher::new(client)),
            config.api.site_url.clone(),
        )
        .with_page_size(config.api.page_size);

        Ok(pipeline)
    }

    /// Run the pipeline once over `regions` and fail if anything went wrong.
    pub async fn execute(&self, regions: &[Region]) -> Result<RunStats> {
        self.run(regions).await?.into_result()
    }

    /// Run the pipeline once over `regions`.
    ///
    /// Returns after the persistence sink signalled completion and every
    /// stage has released its error sink, so the report holds every error of
    /// the run. Fails only if the sink disappeared without signalling.
    pub async fn run(&self, regions: &[Region]) -> Result<RunReport> {
        log::debug!("Executing offers updates for {} region(s)", regions.len());

        let (errors, mut error_rx) = errors::channel();
        let (done_tx, mut done_rx) = oneshot::channel();

        let regions = source::stream_regions(regions.to_vec());
        let listings = fetch::fetch_offers(
            Arc::clone(&self.api),
            regions,
            self.page_size,
            errors.clone(),
        );
        let offers = map::map_listings(listings, self.site_url.clone(), Arc::clone(&self.clock));
        let branches = classify::classify_offers(Arc::clone(&self.store), offers, errors.clone());

        let notified = merge::merge(vec![
            notify::notify_new(
                Arc::clone(&self.writer),
                Arc::clone(&self.images),
                branches.new,
                errors.clone(),
            ),
            notify::notify_price_change(
                Arc::clone(&self.writer),
                branches.rise,
                Change::PriceRise,
                errors.clone(),
            ),
            notify::notify_price_change(
                Arc::clone(&self.writer),
                branches.drop,
                Change::PriceDrop,
                errors.clone(),
            ),
        ]);

        persist::persist_offers(Arc::clone(&self.store), notified, errors, done_tx);

        let mut collected = Vec::new();
        let completion = loop {
            tokio::select! {
                Some(err) = error_rx.recv() => collected.push(err),
                done = &mut done_rx => break done,
            }
        };

        // Stages may still be releasing their sinks.
        while let Some(err) = error_rx.recv().await {
            collected.push(err);
        }

        let stats = completion.map_err(|_| AppError::Aborted)?;
        let report = RunReport {
            stats,
            errors: RunErrors(collected),
        };

        log::info!(
            "Run finished: {} offer(s) persisted, {} error(s)",
            report.stats.persisted,
            report.errors.len()
        );
        Ok(report)
    }
}
