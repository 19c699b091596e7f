//! Fakes shared by the pipeline tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::error::{AppError, Result};
use crate::models::{
    ListingPage, ListingStats, ListingVendor, Message, Offer, PageRequest, RawListing, Region,
    offer_url,
};
use crate::notify::MessageWriter;
use crate::services::{ImageFetcher, ListingApi};
use crate::storage::{EngineStore, MemoryEngine, OfferStore};

pub fn test_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 9, 20, 0, 0, 0).unwrap()
}

pub fn listing(id: i64) -> RawListing {
    RawListing {
        id,
        slug: format!("offer-{id}"),
        name: format!("Offer {id}"),
        vendor: ListingVendor {
            slug: "acme".into(),
        },
        stats: ListingStats {
            ranges_price_min: 100,
            ranges_price_max: 200,
            ..ListingStats::default()
        },
        ..RawListing::default()
    }
}

/// A page; `has_next` gets its link filled in by [`ScriptedApi::region`].
pub fn page(results: Vec<RawListing>, has_next: bool) -> ListingPage {
    ListingPage {
        page: 1,
        page_size: 50,
        count: results.len() as i64,
        results,
        next: has_next.then(String::new),
    }
}

pub fn offer(id: i64, price_min: i64, price_max: i64) -> Offer {
    Offer {
        id,
        slug: format!("offer-{id}"),
        name: format!("Offer {id}"),
        vendor_slug: "acme".into(),
        link: offer_url("http://site", "acme", &format!("offer-{id}"), id),
        main_image_link: String::new(),
        imported_at: test_time(),
        region_name: "Kraków".into(),
        price_min,
        price_max,
        area_min: 50,
        area_max: 60,
    }
}

/// Serves a fixed sequence of pages per region. Runs out into empty pages.
#[derive(Default)]
pub struct ScriptedApi {
    pages: Mutex<HashMap<Region, VecDeque<Result<ListingPage>>>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(self, region: Region, pages: Vec<Result<ListingPage>>) -> Self {
        let pages = pages
            .into_iter()
            .map(|page| {
                page.map(|mut page| {
                    if page.next.is_some() {
                        page.next = Some(format!("scripted://{region}"));
                    }
                    page
                })
            })
            .collect();
        self.pages.lock().unwrap().insert(region, pages);
        self
    }

    fn pop(&self, region: Region) -> Result<ListingPage> {
        self.pages
            .lock()
            .unwrap()
            .get_mut(&region)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(ListingPage::default()))
    }
}

#[async_trait]
impl ListingApi for ScriptedApi {
    async fn first_page(&self, request: &PageRequest) -> Result<ListingPage> {
        self.pop(request.region)
    }

    async fn next_page(&self, previous: &ListingPage) -> Result<ListingPage> {
        let region = previous
            .next_link()
            .and_then(|link| link.strip_prefix("scripted://"))
            .and_then(|region| region.parse().ok())
            .expect("scripted next link");
        self.pop(region)
    }
}

/// Records delivered messages; fails those whose text starts with a prefix.
#[derive(Default)]
pub struct RecordingWriter {
    messages: Mutex<Vec<Message>>,
    fail_prefix: Option<String>,
}

impl RecordingWriter {
    pub fn failing_on(prefix: &str) -> Self {
        Self {
            fail_prefix: Some(prefix.to_string()),
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<Message> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageWriter for RecordingWriter {
    async fn write(&self, message: &Message) -> Result<()> {
        if let Some(prefix) = &self.fail_prefix {
            if message.text.starts_with(prefix.as_str()) {
                return Err(AppError::notify("rejected"));
            }
        }
        self.messages.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Returns the same bytes for every URL, or always fails.
pub struct StaticImages(Option<Vec<u8>>);

impl StaticImages {
    pub fn new(bytes: &[u8]) -> Self {
        Self(Some(bytes.to_vec()))
    }

    pub fn failing() -> Self {
        Self(None)
    }
}

#[async_trait]
impl ImageFetcher for StaticImages {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.0.clone().ok_or_else(|| AppError::Api {
            url: url.to_string(),
            status: 404,
        })
    }
}

/// Store whose every operation fails.
pub struct FailingStore;

#[async_trait]
impl OfferStore for FailingStore {
    async fn exists(&self, _id: i64) -> Result<bool> {
        Err(AppError::s3("unavailable"))
    }

    async fn get(&self, _id: i64) -> Result<Offer> {
        Err(AppError::s3("unavailable"))
    }

    async fn save(&self, _offer: &Offer) -> Result<()> {
        Err(AppError::s3("unavailable"))
    }

    async fn create(&self, _offer: &Offer) -> Result<()> {
        Err(AppError::s3("unavailable"))
    }

    async fn delete(&self, _offer: &Offer) -> Result<()> {
        Err(AppError::s3("unavailable"))
    }
}

/// In-memory store that refuses to save the given ids.
pub struct RejectingStore {
    inner: EngineStore,
    rejected: Vec<i64>,
}

impl RejectingStore {
    pub fn new(rejected: Vec<i64>) -> Self {
        Self {
            inner: EngineStore::new(Arc::new(MemoryEngine::new())),
            rejected,
        }
    }
}

#[async_trait]
impl OfferStore for RejectingStore {
    async fn exists(&self, id: i64) -> Result<bool> {
        self.inner.exists(id).await
    }

    async fn get(&self, id: i64) -> Result<Offer> {
        self.inner.get(id).await
    }

    async fn save(&self, offer: &Offer) -> Result<()> {
        if self.rejected.contains(&offer.id) {
            return Err(AppError::s3("write refused"));
        }
        self.inner.save(offer).await
    }

    async fn create(&self, offer: &Offer) -> Result<()> {
        self.inner.create(offer).await
    }

    async fn delete(&self, offer: &Offer) -> Result<()> {
        self.inner.delete(offer).await
    }
}
