// src/lib.rs

//! offers-updates library
//!
//! Polls the primary-market listing API region by region, reports new
//! offers and price changes, and remembers what it has seen.

pub mod config;
pub mod error;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;

pub use pipeline::{OffersUpdates, RunReport, RunStats};
