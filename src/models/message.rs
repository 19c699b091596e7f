//! Outbound notification message.

/// A human readable notification about one offer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    /// Image URL for photo messages, empty otherwise
    pub title: String,

    /// Raw image bytes, empty when there is nothing to upload
    pub image: Vec<u8>,

    pub text: String,
}
