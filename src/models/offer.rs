//! Offer data structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RawListing;

/// Canonical record of one listing, as persisted in the store.
///
/// `id` is the only identity: two offers with the same id are the same
/// listing observed at different times.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Offer {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub vendor_slug: String,

    /// Canonical URL of the offer page
    pub link: String,

    pub main_image_link: String,

    /// When this run processed the offer
    pub imported_at: DateTime<Utc>,

    pub region_name: String,
    pub price_min: i64,
    pub price_max: i64,
    pub area_min: i32,
    pub area_max: i32,
}

impl Offer {
    /// Build an offer from an API listing.
    pub fn from_listing(listing: RawListing, site_url: &str, imported_at: DateTime<Utc>) -> Self {
        let link = offer_url(site_url, &listing.vendor.slug, &listing.slug, listing.id);

        Self {
            id: listing.id,
            slug: listing.slug,
            name: listing.name,
            vendor_slug: listing.vendor.slug,
            link,
            main_image_link: listing.main_image.medium,
            imported_at,
            region_name: listing.region.full_name,
            price_min: listing.stats.ranges_price_min,
            price_max: listing.stats.ranges_price_max,
            area_min: listing.stats.ranges_area_min,
            area_max: listing.stats.ranges_area_max,
        }
    }

    /// Sum of both price bounds, used to compare two observations.
    pub fn price_sum(&self) -> i64 {
        self.price_min.saturating_add(self.price_max)
    }

    /// Whether the API published any price for this offer.
    pub fn has_price(&self) -> bool {
        self.price_min > 0 || self.price_max > 0
    }
}

/// Canonical offer URL: `<site>/oferty/<vendor>/<slug>-<id>`.
pub fn offer_url(site_url: &str, vendor_slug: &str, slug: &str, id: i64) -> String {
    format!(
        "{}/oferty/{}/{}-{}",
        site_url.trim_end_matches('/'),
        vendor_slug,
        slug,
        id
    )
}
