// src/services/listings.rs

//! Listing API client.
//!
//! Fetches pages of primary-market offers for one region at a time.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::Result;
use crate::models::{ListingPage, PageRequest};
use crate::utils::http::fetch_bytes;

/// Paginated source of raw listings.
#[async_trait]
pub trait ListingApi: Send + Sync {
    /// Fetch the first page for a region.
    async fn first_page(&self, request: &PageRequest) -> Result<ListingPage>;

    /// Follow the `next` link of a previously fetched page.
    async fn next_page(&self, previous: &ListingPage) -> Result<ListingPage>;
}

const OFFERS_PATH: &str = "/s/v2/offers/offer";

/// [`ListingApi`] over the public HTTP endpoint.
pub struct HttpListingApi {
    client: Client,
    base_url: String,
}

impl HttpListingApi {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Build the URL of the first page for a request.
    pub fn first_page_url(&self, request: &PageRequest) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            OFFERS_PATH
        ))?;

        url.query_pairs_mut()
            .append_pair("s", "offer-list")
            .append_pair("display_type", "1")
            .append_pair("distance", "0")
            .append_pair("for_sale", "True")
            .append_pair("limited_presentation", "True")
            .append_pair("page", "1")
            .append_pair("page_size", &request.page_size.to_string())
            .append_pair("region", &request.region.to_string())
            .append_pair("show_on_listing", "True")
            .append_pair("sort", request.sort.as_str())
            .append_pair("type", "2");

        Ok(url)
    }

    async fn get_page(&self, url: &str) -> Result<ListingPage> {
        let body = fetch_bytes(&self.client, url).await?;
        let page: ListingPage = serde_json::from_slice(&body)?;
        log::debug!(
            "Fetched page {} with {} of {} offers",
            page.page,
            page.results.len(),
            page.page_size
        );
        Ok(page)
    }
}

#[async_trait]
impl ListingApi for HttpListingApi {
    async fn first_page(&self, request: &PageRequest) -> Result<ListingPage> {
        let url = self.first_page_url(request)?;
        self.get_page(url.as_str()).await
    }

    async fn next_page(&self, previous: &ListingPage) -> Result<ListingPage> {
        match previous.next_link() {
            Some(next) => self.get_page(next).await,
            // Nothing to follow; an empty page ends pagination.
            None => Ok(ListingPage::default()),
        }
    }
}
