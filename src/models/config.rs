//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

use super::Region;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Listing API and HTTP client settings
    #[serde(default)]
    pub api: ApiConfig,

    /// What to fetch on each run
    #[serde(default)]
    pub request: RequestConfig,

    /// Where offer state is kept between runs
    #[serde(default)]
    pub storage: StorageConfig,

    /// Telegram delivery; log output is used when unset
    #[serde(default)]
    pub telegram: TelegramConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Override values from environment variables.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    /// Override values from an arbitrary variable lookup.
    pub fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = var("URL") {
            self.api.site_url = url;
        }
        if let Some(url) = var("API_URL") {
            self.api.base_url = url;
        }
        if let Some(regions) = var("REQUEST_REGIONS") {
            self.request.regions = parse_regions(&regions)?;
        }
        if let Some(path) = var("FS_STORE_PATH") {
            self.storage.path = Some(path);
        }

        if let Some(bucket) = var("AWS_S3_BUCKET") {
            self.storage.s3.get_or_insert_with(S3Config::default).bucket = bucket;
        }
        // The remaining AWS variables only refine an already selected bucket.
        if let Some(s3) = self.storage.s3.as_mut() {
            if let Some(region) = var("AWS_REGION") {
                s3.region = region;
            }
            if let Some(endpoint) = var("AWS_ENDPOINT") {
                s3.endpoint = Some(endpoint);
            }
            if let Some(prefix) = var("AWS_S3_PREFIX") {
                s3.prefix = prefix;
            }
        }

        if let Some(chat_id) = var("TELEGRAM_CHAT_ID") {
            self.telegram.chat_id = chat_id.trim().parse().map_err(|_| {
                AppError::config(format!("TELEGRAM_CHAT_ID is not a number: {chat_id}"))
            })?;
        }
        if let Some(token) = var("TELEGRAM_TOKEN") {
            self.telegram.token = token;
        }

        if var("DEBUG").is_some_and(|v| is_truthy(&v)) {
            self.logging.level = "debug".into();
        }

        Ok(())
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(AppError::validation("api.base_url is empty"));
        }
        if self.api.site_url.trim().is_empty() {
            return Err(AppError::validation("api.site_url is empty"));
        }
        url::Url::parse(&self.api.base_url)?;
        url::Url::parse(&self.api.site_url)?;

        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::validation("api.user_agent is empty"));
        }
        if self.api.page_size == 0 {
            return Err(AppError::validation("api.page_size must be > 0"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::validation("api.timeout_secs must be > 0"));
        }
        if self.request.regions.is_empty() {
            return Err(AppError::validation("No regions defined"));
        }

        if let Some(s3) = &self.storage.s3 {
            if s3.bucket.trim().is_empty() != s3.region.trim().is_empty() {
                return Err(AppError::validation(
                    "storage.s3 needs both bucket and region",
                ));
            }
        }

        if self.telegram.token.trim().is_empty() != (self.telegram.chat_id == 0) {
            return Err(AppError::validation(
                "telegram needs both token and chat_id",
            ));
        }

        Ok(())
    }
}

/// Whether a flag-like value such as `DEBUG=1` is switched on.
pub fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes")
}

/// Parse a comma separated region list, e.g. `"11158, 8647"`.
pub fn parse_regions(value: &str) -> Result<Vec<Region>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Region>()
                .map_err(|_| AppError::config(format!("Invalid region id: {s}")))
        })
        .collect()
}

/// Listing API and HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the listing API
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Public site URL used to build offer links
    #[serde(default = "defaults::site_url")]
    pub site_url: String,

    /// Offers per page
    #[serde(default = "defaults::page_size")]
    pub page_size: u32,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            site_url: defaults::site_url(),
            page_size: defaults::page_size(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// What to fetch on each run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Region ids; duplicates are fetched twice
    #[serde(default)]
    pub regions: Vec<Region>,
}

/// Offer state storage. S3 wins over a local path; neither means in-memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for the local filesystem engine
    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub s3: Option<S3Config>,
}

/// S3 (or S3-compatible) bucket settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Config {
    #[serde(default)]
    pub bucket: String,

    #[serde(default)]
    pub region: String,

    /// Custom endpoint for S3-like services; enables path-style addressing
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Key prefix for offer records
    #[serde(default)]
    pub prefix: String,
}

impl S3Config {
    /// Both bucket and region are set.
    pub fn is_complete(&self) -> bool {
        !self.bucket.trim().is_empty() && !self.region.trim().is_empty()
    }
}

/// Telegram bot settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Chat notifications are sent to
    #[serde(default)]
    pub chat_id: i64,

    /// Bot token
    #[serde(default)]
    pub token: String,
}

impl TelegramConfig {
    pub fn is_enabled(&self) -> bool {
        self.chat_id != 0 && !self.token.trim().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    pub fn base_url() -> String {
        "https://rynekpierwotny.pl".into()
    }
    pub fn site_url() -> String {
        "https://rynekpierwotny.pl".into()
    }
    pub fn page_size() -> u32 {
        50
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/74.0.3729.169 Safari/537.36".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn log_level() -> String {
        "info".into()
    }
}
