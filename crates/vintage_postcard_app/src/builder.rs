// SPDX-License-Identifier: MIT OR Apache-2.0
//! Step-by-step postcard builder.
//!
//! The builder walks through four steps:
//! 1. Photo
//! 2. Message
//! 3. Stamp
//! 4. Sender and recipient details
//!
//! Forward navigation is gated by [`is_step_complete`], evaluated against the
//! draft every time it is asked.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vintage_postcard_codec::{PostcardRecord, Stamp, StampCatalog};

/// Number of builder steps
pub const STEP_COUNT: u8 = 4;

/// Builder errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuilderError {
    /// The current step's precondition is not met
    #[error("Step {0} is not complete")]
    StepIncomplete(u8),

    /// Already at the final step
    #[error("Already at the last step")]
    AtLastStep,

    /// A required form field is blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// No stamp with this id in the catalog
    #[error("Unknown stamp: {0}")]
    UnknownStamp(u32),
}

/// Whether forward navigation from `step` is allowed for this draft
pub fn is_step_complete(step: u8, record: &PostcardRecord) -> bool {
    match step {
        1 => record.photo.is_some(),
        2 => !record.message.trim().is_empty(),
        3 => record.stamp.is_some(),
        _ => true,
    }
}

/// Sender and recipient details collected on the last step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    /// Sender's name
    pub sender_name: String,
    /// Recipient's name
    pub recipient_name: String,
    /// Recipient's email address
    pub recipient_email: String,
}

impl ContactDetails {
    /// Create contact details
    pub fn new(
        sender_name: impl Into<String>,
        recipient_name: impl Into<String>,
        recipient_email: impl Into<String>,
    ) -> Self {
        Self {
            sender_name: sender_name.into(),
            recipient_name: recipient_name.into(),
            recipient_email: recipient_email.into(),
        }
    }

    /// Check that every field is filled in
    pub fn validate(&self) -> Result<(), BuilderError> {
        let fields = [
            ("senderName", &self.sender_name),
            ("recipientName", &self.recipient_name),
            ("recipientEmail", &self.recipient_email),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(BuilderError::MissingField(name));
            }
        }
        Ok(())
    }
}

/// Guided postcard builder
#[derive(Debug, Clone)]
pub struct PostcardBuilder {
    step: u8,
    draft: PostcardRecord,
}

impl PostcardBuilder {
    /// Create a builder on step 1 with an empty draft
    pub fn new() -> Self {
        Self {
            step: 1,
            draft: PostcardRecord::new(),
        }
    }

    /// Current step, 1 through [`STEP_COUNT`]
    pub fn step(&self) -> u8 {
        self.step
    }

    /// The draft as it stands
    pub fn draft(&self) -> &PostcardRecord {
        &self.draft
    }

    /// Progress through the flow in percent
    pub fn progress_percent(&self) -> f32 {
        f32::from(self.step) / f32::from(STEP_COUNT) * 100.0
    }

    /// Set the photo (step 1)
    pub fn set_photo(&mut self, photo: impl Into<String>) {
        self.draft.photo = Some(photo.into());
    }

    /// Set the message (step 2)
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.draft.message = message.into();
    }

    /// Set the stamp (step 3)
    pub fn set_stamp(&mut self, stamp: Stamp) {
        self.draft.stamp = Some(stamp);
    }

    /// Pick a stamp from a catalog by id (step 3)
    pub fn select_stamp(&mut self, catalog: &StampCatalog, id: u32) -> Result<(), BuilderError> {
        let stamp = catalog.get(id).ok_or(BuilderError::UnknownStamp(id))?;
        self.set_stamp(stamp.clone());
        Ok(())
    }

    /// Set sender and recipient details (step 4)
    pub fn set_contact(&mut self, contact: ContactDetails) {
        self.draft.sender_name = contact.sender_name;
        self.draft.recipient_name = contact.recipient_name;
        self.draft.recipient_email = contact.recipient_email;
    }

    /// Whether the Next action is available
    pub fn can_advance(&self) -> bool {
        self.step < STEP_COUNT && is_step_complete(self.step, &self.draft)
    }

    /// Move to the next step
    pub fn next(&mut self) -> Result<u8, BuilderError> {
        if self.step >= STEP_COUNT {
            return Err(BuilderError::AtLastStep);
        }
        if !is_step_complete(self.step, &self.draft) {
            return Err(BuilderError::StepIncomplete(self.step));
        }

        self.step += 1;
        tracing::debug!("Builder advanced to step {}", self.step);
        Ok(self.step)
    }

    /// Move to the previous step; stays put on step 1
    pub fn back(&mut self) -> u8 {
        if self.step > 1 {
            self.step -= 1;
        }
        self.step
    }

    /// Snapshot of the draft for previewing
    pub fn preview(&self) -> PostcardRecord {
        self.draft.clone()
    }

    /// Merge the contact form into the draft and freeze it
    pub fn finalize(&mut self, contact: ContactDetails) -> Result<PostcardRecord, BuilderError> {
        contact.validate()?;
        self.set_contact(contact);
        Ok(self.draft.clone())
    }
}

impl Default for PostcardBuilder {
    fn default() -> Self {
        Self::new()
    }
}
