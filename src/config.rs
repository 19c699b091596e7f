// src/config.rs

//! Configuration loading utilities.
//!
//! Every entry point ends up with the same layering: file (or stored
//! object), then environment overrides.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::storage::StorageEngine;

/// Finish a configuration loaded from `path` by applying environment overrides.
///
/// A missing or broken file falls back to defaults. Call this once logging is
/// up so the fallback warning is not lost.
pub fn resolve_config(loaded: Result<Config>, path: &Path) -> Result<Config> {
    let mut config = loaded.unwrap_or_else(|e| {
        log::warn!(
            "Config load failed from {}: {}. Using defaults.",
            path.display(),
            e
        );
        Config::default()
    });
    config.apply_env()?;
    Ok(config)
}

/// Log filter to start with: `debug` when forced, else the configured level.
pub fn log_level(debug: bool, config: Option<&Config>) -> &str {
    if debug {
        return "debug";
    }
    config.map_or("info", |config| config.logging.level.as_str())
}

/// Loads `config.toml` from a storage engine, e.g. an S3 bucket.
pub struct StoredConfigLoader<'a> {
    engine: &'a dyn StorageEngine,
    key: String,
}

impl<'a> StoredConfigLoader<'a> {
    pub fn new(engine: &'a dyn StorageEngine, key: impl Into<String>) -> Self {
        Self {
            engine,
            key: key.into(),
        }
    }

    /// Read and parse the stored file, then apply environment overrides.
    pub async fn load(&self) -> Result<Config> {
        let mut config = self.parse().await?;
        config.apply_env()?;
        Ok(config)
    }

    async fn parse(&self) -> Result<Config> {
        let location = self.engine.location(&self.key);
        log::info!("Loading config file from {}", location);

        let Some(bytes) = self.engine.read(&self.key).await? else {
            let message = format!("Config file not found: {location}");
            return Err(AppError::config(message));
        };

        let content = String::from_utf8(bytes).map_err(|e| {
            AppError::config(format!(
                "Config file {} is not valid UTF-8: {}",
                self.key, e
            ))
        })?;
        Ok(toml::from_str(&content)?)
    }
}
