//! Telegram delivery through the Bot API.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InputFile};

use crate::error::{AppError, Result};
use crate::models::Message;

use super::MessageWriter;

/// Sends messages to a single Telegram chat.
///
/// Messages with an image become a photo with the text as caption; text-only
/// messages become a plain text message.
pub struct TelegramWriter {
    bot: Bot,
    chat_id: ChatId,
}

/// What a message turns into on the Telegram side.
#[derive(Debug, PartialEq, Eq)]
enum Delivery<'a> {
    Photo {
        file_name: &'a str,
        caption: &'a str,
        bytes: &'a [u8],
    },
    Text(String),
}

impl<'a> Delivery<'a> {
    fn of(message: &'a Message) -> Result<Self> {
        if !message.image.is_empty() {
            return Ok(Delivery::Photo {
                file_name: &message.title,
                caption: &message.text,
                bytes: &message.image,
            });
        }

        if !message.text.is_empty() {
            let text = if message.title.is_empty() {
                message.text.clone()
            } else {
                format!("{}\n\n{}", message.title, message.text)
            };
            return Ok(Delivery::Text(text));
        }

        Err(AppError::notify("no handler for message"))
    }
}

impl TelegramWriter {
    pub fn new(token: &str, chat_id: i64) -> Self {
        Self {
            bot: Bot::new(token),
            chat_id: ChatId(chat_id),
        }
    }
}

#[async_trait]
impl MessageWriter for TelegramWriter {
    async fn write(&self, message: &Message) -> Result<()> {
        match Delivery::of(message)? {
            Delivery::Photo {
                file_name,
                caption,
                bytes,
            } => {
                let photo = InputFile::memory(bytes.to_vec()).file_name(file_name.to_string());
                self.bot
                    .send_photo(self.chat_id, photo)
                    .caption(caption)
                    .await
                    .map_err(AppError::notify)?;
            }
            Delivery::Text(text) => {
                self.bot
                    .send_message(self.chat_id, text)
                    .await
                    .map_err(AppError::notify)?;
            }
        }

        log::debug!("Sent message to chat {}", self.chat_id.0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_becomes_photo() {
        let message = Message {
            title: "http://img/1.jpg".into(),
            image: b"yay".to_vec(),
            text: "caption".into(),
        };

        assert_eq!(
            Delivery::of(&message).unwrap(),
            Delivery::Photo {
                file_name: "http://img/1.jpg",
                caption: "caption",
                bytes: b"yay",
            }
        );
    }

    #[test]
    fn test_text_with_title() {
        let message = Message {
            title: "Title".into(),
            text: "body".into(),
            ..Message::default()
        };
        assert_eq!(
            Delivery::of(&message).unwrap(),
            Delivery::Text("Title\n\nbody".into())
        );
    }

    #[test]
    fn test_text_without_title() {
        let message = Message {
            text: "body".into(),
            ..Message::default()
        };
        assert_eq!(
            Delivery::of(&message).unwrap(),
            Delivery::Text("body".into())
        );
    }

    #[test]
    fn test_empty_message_has_no_handler() {
        let err = Delivery::of(&Message::default()).unwrap_err();
        assert!(matches!(err, AppError::Notify(_)));
    }
}
