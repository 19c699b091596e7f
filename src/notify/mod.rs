//! Outbound notification channels.
//!
//! A [`MessageWriter`] delivers one rendered [`Message`]. Telegram is used
//! when a bot token and chat id are configured; otherwise messages only go to
//! the log, which is handy for dry runs.

mod log_writer;
#[cfg(feature = "telegram")]
mod telegram;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Message, TelegramConfig};

pub use log_writer::LogWriter;
#[cfg(feature = "telegram")]
pub use telegram::TelegramWriter;

/// Delivers notifications to a human-facing channel.
#[async_trait]
pub trait MessageWriter: Send + Sync {
    async fn write(&self, message: &Message) -> Result<()>;
}

/// Build the configured writer.
pub fn from_config(config: &TelegramConfig) -> Result<Arc<dyn MessageWriter>> {
    if config.is_enabled() {
        return telegram_writer(config);
    }

    log::info!("Telegram is not configured, notifications go to the log");
    Ok(Arc::new(LogWriter))
}

#[cfg(feature = "telegram")]
fn telegram_writer(config: &TelegramConfig) -> Result<Arc<dyn MessageWriter>> {
    log::debug!("Using Telegram chat {}", config.chat_id);
    Ok(Arc::new(TelegramWriter::new(&config.token, config.chat_id)))
}

#[cfg(not(feature = "telegram"))]
fn telegram_writer(_config: &TelegramConfig) -> Result<Arc<dyn MessageWriter>> {
    Err(crate::error::AppError::config(
        "telegram is configured but Telegram support is not compiled in (feature \"telegram\")",
    ))
}
