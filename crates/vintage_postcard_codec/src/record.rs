// SPDX-License-Identifier: MIT OR Apache-2.0
//! The postcard record carried by a share link.

use crate::stamp::Stamp;
use serde::{Deserialize, Serialize};

/// Conventional maximum message length, in characters
pub const MESSAGE_SOFT_LIMIT: usize = 500;

/// Number of characters kept by [`PostcardRecord::message_preview`]
pub const MESSAGE_PREVIEW_CHARS: usize = 100;

/// A postcard: photo, message, stamp and the two correspondents.
///
/// Field names follow the camelCase keys used on the wire so links created
/// by older builds still decode. The text fields are required; `photo` and
/// `stamp` may be `null` or absent. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostcardRecord {
    /// Photo as a data URI or an external URL
    pub photo: Option<String>,
    /// Free-form message
    pub message: String,
    /// Name of the person sending the postcard
    pub sender_name: String,
    /// Name of the person receiving the postcard
    pub recipient_name: String,
    /// Address the postcard link is delivered to
    pub recipient_email: String,
    /// Decorative stamp
    pub stamp: Option<Stamp>,
}

impl PostcardRecord {
    /// Create an empty draft
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the photo
    pub fn with_photo(mut self, photo: impl Into<String>) -> Self {
        self.photo = Some(photo.into());
        self
    }

    /// Set the message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the stamp
    pub fn with_stamp(mut self, stamp: Stamp) -> Self {
        self.stamp = Some(stamp);
        self
    }

    /// Set sender, recipient and recipient address
    pub fn with_contact(
        mut self,
        sender_name: impl Into<String>,
        recipient_name: impl Into<String>,
        recipient_email: impl Into<String>,
    ) -> Self {
        self.sender_name = sender_name.into();
        self.recipient_name = recipient_name.into();
        self.recipient_email = recipient_email.into();
        self
    }

    /// Number of characters in the message
    pub fn message_len(&self) -> usize {
        self.message.chars().count()
    }

    /// Whether the message is longer than [`MESSAGE_SOFT_LIMIT`]
    pub fn is_over_soft_limit(&self) -> bool {
        self.message_len() > MESSAGE_SOFT_LIMIT
    }

    /// Characters left before [`MESSAGE_SOFT_LIMIT`], saturating at zero
    pub fn characters_remaining(&self) -> usize {
        MESSAGE_SOFT_LIMIT.saturating_sub(self.message_len())
    }

    /// Short excerpt of the message for notification emails
    pub fn message_preview(&self) -> String {
        let mut preview: String = self.message.chars().take(MESSAGE_PREVIEW_CHARS).collect();
        preview.push_str("...");
        preview
    }
}
