//! AWS Lambda entry point for offers-updates
//!
//! Deploy with `cargo lambda build --release --features lambda`
//! and trigger it on a schedule.
//!
//! ## Environment Variables
//!
//! - `REQUEST_REGIONS`: Comma separated region ids
//! - `API_URL`, `URL`: Listing API and public site
//! - `AWS_S3_BUCKET`, `AWS_REGION`, `AWS_S3_PREFIX`, `AWS_ENDPOINT`: Offer storage
//! - `CONFIG_S3_KEY`: Optional `config.toml` object in the same bucket
//! - `TELEGRAM_CHAT_ID`, `TELEGRAM_TOKEN`: Notification target
//! - `RUST_LOG`: Log level (e.g., `info`, `debug`)

use lambda_runtime::{Error as LambdaError, service_fn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use offers_updates::lambda::handler;

/// Main entry point for the AWS Lambda function.
#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!("offers-updates Lambda starting...");
    lambda_runtime::run(service_fn(handler)).await
}
