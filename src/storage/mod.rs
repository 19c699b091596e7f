//! Storage abstractions for offer persistence.
//!
//! Offer state is a flat key/value layout: one JSON document per offer,
//! addressed by its id. No index or listing is needed, lookups are always
//! by id.
//!
//! ## Layout
//!
//! ```text
//! {root or bucket/prefix}/
//! ├── 11158.json
//! ├── 11342.json
//! └── ...
//! ```
//!
//! Engines move raw bytes ([`StorageEngine`]); [`EngineStore`] adds the
//! offer (de)serialization on top and implements [`OfferStore`].

pub mod local;
pub mod memory;
#[cfg(feature = "s3")]
pub mod s3;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{Offer, S3Config, StorageConfig};

// Re-export for convenience
pub use local::LocalEngine;
pub use memory::MemoryEngine;
#[cfg(feature = "s3")]
pub use s3::S3Engine;

/// Byte-level key/value backend.
#[async_trait]
pub trait StorageEngine: Send + Sync {
    /// Read an object, returning `None` if it does not exist.
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Create or overwrite an object.
    async fn write(&self, key: &str, bytes: &[u8]) -> Result<()>;

    async fn exists(&self, key: &str) -> Result<bool>;

    /// Remove an object. Removing a missing object is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Human readable location of a key, for logs.
    fn location(&self, key: &str) -> String;
}

/// Persisted offer state, one record per offer id.
///
/// Implementations must be safe to call from several pipeline stages at once.
/// A read followed by a write for the same id is not atomic.
#[async_trait]
pub trait OfferStore: Send + Sync {
    async fn exists(&self, id: i64) -> Result<bool>;

    /// Fetch the stored offer, failing with [`AppError::NotFound`] when absent.
    async fn get(&self, id: i64) -> Result<Offer>;

    /// Create or overwrite the record for `offer.id`.
    async fn save(&self, offer: &Offer) -> Result<()>;

    /// Insert a record, failing with [`AppError::AlreadyExists`] when present.
    async fn create(&self, offer: &Offer) -> Result<()>;

    async fn delete(&self, offer: &Offer) -> Result<()>;
}

/// [`OfferStore`] over any [`StorageEngine`], storing offers as JSON.
pub struct EngineStore {
    engine: Arc<dyn StorageEngine>,
}

impl EngineStore {
    pub fn new(engine: Arc<dyn StorageEngine>) -> Self {
        Self { engine }
    }

    /// Key of the record for an offer id.
    pub fn key(id: i64) -> String {
        format!("{id}.json")
    }
}

#[async_trait]
impl OfferStore for EngineStore {
    async fn exists(&self, id: i64) -> Result<bool> {
        self.engine.exists(&Self::key(id)).await
    }

    async fn get(&self, id: i64) -> Result<Offer> {
        let key = Self::key(id);
        match self.engine.read(&key).await? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Err(AppError::not_found(self.engine.location(&key))),
        }
    }

    async fn save(&self, offer: &Offer) -> Result<()> {
        let bytes = serde_json::to_vec(offer)?;
        self.engine.write(&Self::key(offer.id), &bytes).await
    }

    async fn create(&self, offer: &Offer) -> Result<()> {
        let key = Self::key(offer.id);
        if self.engine.exists(&key).await? {
            return Err(AppError::already_exists(self.engine.location(&key)));
        }
        self.save(offer).await
    }

    async fn delete(&self, offer: &Offer) -> Result<()> {
        self.engine.delete(&Self::key(offer.id)).await
    }
}

/// Build the configured engine: S3 when bucket and region are set, then a
/// local directory, otherwise an in-memory engine that forgets everything
/// when the process exits.
pub async fn engine_from_config(config: &StorageConfig) -> Result<Arc<dyn StorageEngine>> {
    if let Some(s3) = config.s3.as_ref().filter(|s3| s3.is_complete()) {
        log::debug!("Using S3 storage in bucket {}", s3.bucket);
        return s3_engine(s3).await;
    }

    if let Some(path) = config.path.as_deref().filter(|p| !p.trim().is_empty()) {
        log::debug!("Using local storage at {}", path);
        return Ok(Arc::new(LocalEngine::create(path).await?));
    }

    log::warn!("No storage configured, offer state is kept in memory");
    Ok(Arc::new(MemoryEngine::new()))
}

#[cfg(feature = "s3")]
async fn s3_engine(config: &S3Config) -> Result<Arc<dyn StorageEngine>> {
    Ok(Arc::new(S3Engine::from_config(config).await))
}

#[cfg(not(feature = "s3"))]
async fn s3_engine(_config: &S3Config) -> Result<Arc<dyn StorageEngine>> {
    Err(AppError::config(
        "storage.s3 is configured but S3 support is not compiled in (feature \"s3\")",
    ))
}

/// Build the configured offer store.
pub async fn from_config(config: &StorageConfig) -> Result<Arc<dyn OfferStore>> {
    let engine = engine_from_config(config).await?;
    Ok(Arc::new(EngineStore::new(engine)))
}
