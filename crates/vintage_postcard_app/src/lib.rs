// SPDX-License-Identifier: MIT OR Apache-2.0
//! Vintage Postcard application.
//!
//! Two views share one host:
//! - A four-step builder (photo, message, stamp, contact details) that ends
//!   in a share link or an email
//! - A viewer that decodes a link and plays the timed reveal, with optional
//!   narration of the message
//!
//! ## Architecture
//!
//! The record model and token codec live in `vintage_postcard_codec`, the
//! reveal timing in `vintage_postcard_sequencer`. This crate wires them to
//! the builder, the narration and delivery collaborators, RON configuration
//! and the `vintage_postcard` binary.

pub mod app;
pub mod builder;
pub mod config;
pub mod delivery;
pub mod error;
pub mod link;
pub mod narration;
pub mod photo;
pub mod viewer;

pub use app::{NarratorFactory, PostcardApp, View};
pub use builder::{is_step_complete, BuilderError, ContactDetails, PostcardBuilder, STEP_COUNT};
pub use config::{AppConfig, RevealConfig, CONFIG_FILE_NAME};
pub use delivery::{
    DeliveryConfig, DeliveryOutcome, DeliveryRequest, DeliveryService, EmailJsDelivery,
};
pub use error::{AppError, Result};
pub use link::{LinkConfig, ShareLink};
pub use narration::{
    NarrationCallbacks, NarrationEngine, NarrationSession, NarrationState, TranscriptNarrator,
    UnsupportedNarrator, Utterance, UtteranceEvents, UtteranceId, VoiceSettings,
};
pub use viewer::{LetterText, ViewerController, ViewerFrame};
