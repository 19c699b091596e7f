// src/pipeline/notify.rs

//! Notifier stage.
//!
//! Renders one message per reportable offer and forwards the offer only
//! after the message was delivered. Failed offers are not forwarded, so they
//! are not persisted and show up again on the next run.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::error::Result;
use crate::models::{Change, Message, Offer};
use crate::notify::MessageWriter;
use crate::services::ImageFetcher;

use super::HANDOFF;
use super::errors::{ErrorSink, Stage};

/// Render the announcement of a newly seen offer.
pub fn new_offer_message(offer: &Offer, image: Vec<u8>) -> Message {
    let mut text = format!(
        "🏡{}\n📍 {}\n📏 {}-{}\n",
        offer.name, offer.region_name, offer.area_min, offer.area_max
    );
    if offer.has_price() {
        text.push_str(&format!("🙀 {}-{}\n", offer.price_min, offer.price_max));
    }
    text.push_str(&format!("\n➡️ {}", offer.link));

    Message {
        title: offer.main_image_link.clone(),
        image,
        text,
    }
}

/// Render a price change notice. `change` must be a rise or a drop.
pub fn price_change_message(offer: &Offer, change: Change) -> Message {
    let marker = match change {
        Change::PriceDrop => "↘️",
        _ => "↗️",
    };

    Message {
        text: format!(
            "➡️ {}\n\n{} {}-{}",
            offer.link, marker, offer.price_min, offer.price_max
        ),
        ..Message::default()
    }
}

/// Announce new offers, attaching the main image when there is one.
pub fn notify_new(
    writer: Arc<dyn MessageWriter>,
    images: Arc<dyn ImageFetcher>,
    mut offers: mpsc::Receiver<Offer>,
    errors: ErrorSink,
) -> mpsc::Receiver<Offer> {
    let (tx, rx) = mpsc::channel(HANDOFF);

    tokio::spawn(async move {
        while let Some(offer) = offers.recv().await {
            match announce_new(&*writer, &*images, &offer).await {
                Ok(()) => {
                    if tx.send(offer).await.is_err() {
                        break;
                    }
                }
                Err(e) => errors.report(Stage::Notify, e),
            }
        }
    });

    rx
}

async fn announce_new(
    writer: &dyn MessageWriter,
    images: &dyn ImageFetcher,
    offer: &Offer,
) -> Result<()> {
    let image = if offer.main_image_link.is_empty() {
        Vec::new()
    } else {
        log::debug!("Getting main image for offer {}", offer.id);
        images.fetch(&offer.main_image_link).await?
    };

    log::debug!("Notifying new offer {}", offer.id);
    writer.write(&new_offer_message(offer, image)).await
}

/// Announce price rises or drops.
pub fn notify_price_change(
    writer: Arc<dyn MessageWriter>,
    mut offers: mpsc::Receiver<Offer>,
    change: Change,
    errors: ErrorSink,
) -> mpsc::Receiver<Offer> {
    let (tx, rx) = mpsc::channel(HANDOFF);

    tokio::spawn(async move {
        while let Some(offer) = offers.recv().await {
            log::debug!("Notifying {} for offer {}", change, offer.id);
            match writer.write(&price_change_message(&offer, change)).await {
                Ok(()) => {
                    if tx.send(offer).await.is_err() {
                        break;
                    }
                }
                Err(e) => errors.report(Stage::Notify, e),
            }
        }
    });

    rx
}
