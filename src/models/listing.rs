//! Listing API payloads.

use serde::{Deserialize, Serialize};

use super::Region;

/// Sort order accepted by the listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingSort {
    /// Newest offers first
    CreateDate,
}

impl ListingSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingSort::CreateDate => "create_date",
        }
    }
}

/// Parameters of the first page request for one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub region: Region,
    pub page_size: u32,
    pub sort: ListingSort,
}

/// One page of listings as returned by the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingPage {
    #[serde(default)]
    pub page: i32,

    #[serde(default)]
    pub page_size: i32,

    #[serde(default)]
    pub count: i64,

    #[serde(default)]
    pub results: Vec<RawListing>,

    /// Absolute URL of the next page; null or empty on the last page
    #[serde(default)]
    pub next: Option<String>,
}

impl ListingPage {
    /// Link to the next page, if the API reported one.
    pub fn next_link(&self) -> Option<&str> {
        self.next.as_deref().filter(|next| !next.is_empty())
    }
}

/// A single offer as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawListing {
    pub id: i64,

    #[serde(default)]
    pub slug: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub vendor: ListingVendor,

    #[serde(default)]
    pub main_image: ListingImage,

    #[serde(default)]
    pub region: ListingRegion,

    #[serde(default)]
    pub stats: ListingStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingVendor {
    #[serde(default)]
    pub slug: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingImage {
    #[serde(rename = "m_img_375x211", default)]
    pub medium: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingRegion {
    #[serde(default)]
    pub full_name: String,
}

/// Price and area ranges across all units of an offer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingStats {
    #[serde(default)]
    pub ranges_area_min: i32,

    #[serde(default)]
    pub ranges_area_max: i32,

    #[serde(default)]
    pub ranges_price_min: i64,

    #[serde(default)]
    pub ranges_price_max: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_with_null_next() {
        let json = r#"{
            "results": [{
                "id": 1,
                "vendor": {"slug": "bar-sp-z-oo"},
                "main_image": {"m_img_375x211": "http://img/1.jpg"},
                "name": "Wille Acme",
                "slug": "wille-acme-krakow-bronowice",
                "region": {"full_name": "małopolskie, Kraków, Bronowice"},
                "stats": {"ranges_area_max": 180, "ranges_area_min": 180,
                          "ranges_price_max": 1450000, "ranges_price_min": 1450000}
            }],
            "count": 1, "page": 1, "page_size": 1, "next": null, "previous": null
        }"#;

        let page: ListingPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.results.len(), 1);
        assert!(page.next_link().is_none());

        let listing = &page.results[0];
        assert_eq!(listing.vendor.slug, "bar-sp-z-oo");
        assert_eq!(listing.main_image.medium, "http://img/1.jpg");
        assert_eq!(listing.stats.ranges_price_max, 1_450_000);
    }

    #[test]
    fn test_empty_next_is_last_page() {
        let page: ListingPage = serde_json::from_str(r#"{"results": [], "next": ""}"#).unwrap();
        assert!(page.next_link().is_none());

        let page: ListingPage =
            serde_json::from_str(r#"{"results": [], "next": "http://api/page2"}"#).unwrap();
        assert_eq!(page.next_link(), Some("http://api/page2"));
    }

    #[test]
    fn test_missing_nested_objects_default() {
        let listing: RawListing = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(listing.id, 7);
        assert!(listing.main_image.medium.is_empty());
        assert_eq!(listing.stats, ListingStats::default());
    }

    #[test]
    fn test_sort_value() {
        assert_eq!(ListingSort::CreateDate.as_str(), "create_date");
    }
}
