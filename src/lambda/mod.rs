// src/lambda/mod.rs

//! AWS Lambda handler for offers-updates.
//!
//! Each invocation performs one pipeline run:
//! 1. Loads configuration from the environment (optionally from a
//!    `config.toml` stored in the S3 bucket, see `CONFIG_S3_KEY`)
//! 2. Fetches offers for the configured or requested regions
//! 3. Notifies about new offers and price changes
//! 4. Persists the notified offers

use lambda_runtime::{Error as LambdaError, LambdaEvent};

use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::config::StoredConfigLoader;
use crate::error::{AppError, Result};
use crate::models::{Config, Region};
use crate::pipeline::{OffersUpdates, RunReport};
use crate::storage::S3Engine;

/// Lambda invocation payload.
#[derive(Debug, Default, Deserialize)]
pub struct OffersRequest {
    /// Regions to fetch instead of the configured ones
    #[serde(default)]
    pub regions: Option<Vec<Region>>,
}

/// Lambda response payload.
#[derive(Debug, Default, Serialize)]
pub struct OffersResponse {
    /// Whether the run finished without any error
    pub success: bool,

    /// Number of offers notified and saved
    pub persisted: usize,

    /// Number of offers notified but not saved
    pub persist_failures: usize,

    /// Every error of the run, or the reason it did not start
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,

    /// Execution time in milliseconds
    pub execution_time_ms: u64,
}

impl From<RunReport> for OffersResponse {
    fn from(report: RunReport) -> Self {
        Self {
            success: report.errors.is_empty(),
            persisted: report.stats.persisted,
            persist_failures: report.stats.persist_failures,
            errors: report.errors.iter().map(|e| e.to_string()).collect(),
            execution_time_ms: 0,
        }
    }
}

/// Main Lambda handler function.
#[instrument(skip(event))]
pub async fn handler(
    event: LambdaEvent<OffersRequest>,
) -> std::result::Result<OffersResponse, LambdaError> {
    let start = std::time::Instant::now();
    let (request, _context) = event.into_parts();

    info!("Starting run: regions={:?}", request.regions);

    let mut response = match run(request).await {
        Ok(report) => OffersResponse::from(report),
        Err(e) => {
            error!("Run failed: {}", e);
            OffersResponse {
                errors: vec![e.to_string()],
                ..Default::default()
            }
        }
    };
    response.execution_time_ms = start.elapsed().as_millis() as u64;

    if response.success {
        info!(
            "Run completed: {} persisted in {}ms",
            response.persisted, response.execution_time_ms
        );
    } else {
        error!("Run finished with {} error(s)", response.errors.len());
    }
    Ok(response)
}

async fn run(request: OffersRequest) -> Result<RunReport> {
    let mut config = load_lambda_config().await?;
    if let Some(regions) = request.regions {
        config.request.regions = regions;
    }
    config.validate()?;

    let pipeline = OffersUpdates::from_config(&config).await?;
    pipeline.run(&config.request.regions).await
}

/// Load configuration suitable for the Lambda environment.
///
/// Without `CONFIG_S3_KEY`, defaults plus environment overrides are used.
async fn load_lambda_config() -> Result<Config> {
    let mut config = Config::default();
    config.apply_env()?;

    let Ok(key) = std::env::var("CONFIG_S3_KEY") else {
        return Ok(config);
    };

    let Some(s3) = config.storage.s3.as_ref().filter(|s3| s3.is_complete()) else {
        let message = "CONFIG_S3_KEY needs AWS_S3_BUCKET and AWS_REGION";
        return Err(AppError::config(message));
    };

    let engine = S3Engine::from_config(s3).await;
    StoredConfigLoader::new(&engine, key).load().await
}
