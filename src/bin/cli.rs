//! offers-updates CLI
//!
//! Local execution entry point. For AWS Lambda, use `offers-updates-lambda`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use offers_updates::{
    OffersUpdates,
    config::{log_level, resolve_config},
    error::{AppError, Result},
    models::{Config, is_truthy, parse_regions},
};

/// offers-updates - new listings and price changes on the primary market
#[derive(Parser, Debug)]
#[command(
    name = "offers-updates",
    version,
    about = "Reports new primary-market offers and their price changes"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch offers, notify about changes and persist them
    Run {
        /// Comma separated region ids, overrides the configuration
        #[arg(short, long)]
        regions: Option<String>,
    },

    /// Validate configuration
    Validate,

    /// Print a stored offer
    Show {
        /// Offer id
        id: i64,
    },

    /// Delete a stored offer so it is reported as new again
    Forget {
        /// Offer id
        id: i64,
    },
}

/// Initialize logging; `RUST_LOG` still takes precedence over `level`.
fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let debug = cli.debug || std::env::var("DEBUG").is_ok_and(|v| is_truthy(&v));

    let loaded = Config::load(&cli.config);
    init_logging(log_level(debug, loaded.as_ref().ok()));

    let mut config = resolve_config(loaded, &cli.config)?;
    log::debug!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Run { regions } => {
            if let Some(regions) = regions {
                config.request.regions = parse_regions(&regions)?;
            }
            validate(&config)?;

            let pipeline = OffersUpdates::from_config(&config).await?;
            match pipeline.execute(&config.request.regions).await {
                Ok(stats) => log::info!("Done! {} offer(s) updated", stats.persisted),
                Err(e) => {
                    log::error!("{}", e);
                    return Err(e);
                }
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            validate(&config)?;
            log::info!("✓ Config OK");
        }

        Command::Show { id } => {
            let store = offers_updates::storage::from_config(&config.storage).await?;
            let offer = store.get(id).await?;
            println!("{}", serde_json::to_string_pretty(&offer)?);
        }

        Command::Forget { id } => {
            let store = offers_updates::storage::from_config(&config.storage).await?;
            let offer = store.get(id).await?;
            store.delete(&offer).await?;
            log::info!("Forgot offer {} ({})", offer.id, offer.link);
        }
    }

    Ok(())
}

fn validate(config: &Config) -> Result<()> {
    config.validate().inspect_err(|e: &AppError| {
        log::error!("Config validation failed: {}", e);
    })
}
