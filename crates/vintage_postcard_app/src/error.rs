// SPDX-License-Identifier: MIT OR Apache-2.0
//! Application error types.
//!
//! None of these are fatal: each one narrows what the user can do
//! (builder instead of viewer, hidden narration controls, a retryable form
//! error) rather than ending the program.

use crate::builder::BuilderError;
use thiserror::Error;
use vintage_postcard_codec::{DecodeError, EncodeError};
use vintage_postcard_sequencer::ScheduleError;

/// Application errors
#[derive(Debug, Error)]
pub enum AppError {
    /// A share token could not be decoded
    #[error("Invalid postcard link: {0}")]
    Decode(#[from] DecodeError),

    /// A postcard could not be encoded
    #[error("Could not encode postcard: {0}")]
    Encode(#[from] EncodeError),

    /// A builder step or the final form is incomplete
    #[error(transparent)]
    Builder(#[from] BuilderError),

    /// A collaborator capability is missing on this system
    #[error("Unsupported capability: {0}")]
    UnsupportedCapability(&'static str),

    /// The delivery collaborator reported a failure
    #[error("Delivery failed: {message}")]
    DeliveryFailure {
        /// Error text reported by the collaborator
        message: String,
        /// HTTP status, when one was received
        status: Option<u16>,
    },

    /// The photo could not be used
    #[error("Photo error: {0}")]
    Photo(String),

    /// The link is not a parseable URL
    #[error("Malformed link: {0}")]
    InvalidLink(String),

    /// Configuration could not be read or written
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reveal schedule is invalid
    #[error("Reveal schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Whether the user can retry the same action
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::DeliveryFailure { .. } | AppError::Io(_))
    }
}

/// Result type for application operations
pub type Result<T> = std::result::Result<T, AppError>;
