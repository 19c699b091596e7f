//! Log-only message writer.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Message;

use super::MessageWriter;

/// Writes every message to the log at info level. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWriter;

#[async_trait]
impl MessageWriter for LogWriter {
    async fn write(&self, message: &Message) -> Result<()> {
        if message.title.is_empty() {
            log::info!("{}", message.text);
        } else {
            log::info!(
                "{} ({} image bytes)\n{}",
                message.title,
                message.image.len(),
                message.text
            );
        }
        Ok(())
    }
}
