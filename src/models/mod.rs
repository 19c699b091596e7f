// src/models/mod.rs

//! Domain models for the offers-updates application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod change;
mod config;
mod listing;
mod message;
mod offer;

// Re-export all public types
pub use change::Change;
pub use config::{
    ApiConfig, Config, LoggingConfig, RequestConfig, S3Config, StorageConfig, TelegramConfig,
    is_truthy, parse_regions,
};
pub use listing::{
    ListingImage, ListingPage, ListingRegion, ListingSort, ListingStats, ListingVendor,
    PageRequest, RawListing,
};
pub use message::Message;
pub use offer::{Offer, offer_url};

/// Opaque region identifier scoping a listing request.
pub type Region = i64;
