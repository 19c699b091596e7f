//! Service layer for the offers-updates application.
//!
//! This module contains the outbound HTTP collaborators of the pipeline:
//! - Listing API client (`HttpListingApi`)
//! - Offer image download (`HttpImageFetcher`)

mod images;
mod listings;

pub use images::{HttpImageFetcher, ImageFetcher};
pub use listings::{HttpListingApi, ListingApi};
