// SPDX-License-Identifier: MIT OR Apache-2.0
//! Viewer controller for an opened postcard.
//!
//! Owns the decoded record, one reveal sequencer and one narration session.
//! Rendering is left to the caller, which asks for a [`ViewerFrame`] whenever
//! the stage changes.

use crate::error::Result;
use crate::narration::{NarrationCallbacks, NarrationSession, NarrationState};
use tokio::sync::{mpsc, watch};
use vintage_postcard_codec::{PostcardRecord, Stamp};
use vintage_postcard_sequencer::{
    RevealSchedule, RevealSequencer, Stage, StageActivation, StageVisibility,
};

/// Shown when the recipient name is blank
pub const DEFAULT_RECIPIENT: &str = "You";
/// Shown when the sender name is blank
pub const DEFAULT_SENDER: &str = "A Friend";
/// Closing line above the signature
pub const CLOSING: &str = "With love,";

/// Letter contents as displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterText<'a> {
    /// Addressee line
    pub to: &'a str,
    /// Sender line
    pub from: &'a str,
    /// Message body
    pub message: &'a str,
    /// Closing line
    pub closing: &'static str,
    /// Signature, blank when the sender left no name
    pub signature: &'a str,
}

impl<'a> LetterText<'a> {
    fn new(record: &'a PostcardRecord) -> Self {
        Self {
            to: non_blank(&record.recipient_name).unwrap_or(DEFAULT_RECIPIENT),
            from: non_blank(&record.sender_name).unwrap_or(DEFAULT_SENDER),
            message: &record.message,
            closing: CLOSING,
            signature: &record.sender_name,
        }
    }
}

fn non_blank(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Everything visible at one stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerFrame<'a> {
    /// Current stage
    pub stage: Stage,
    /// Element visibility for the stage
    pub visibility: StageVisibility,
    /// Photo, once the photo is on screen
    pub photo: Option<&'a str>,
    /// Stamp, once the photo is on screen
    pub stamp: Option<&'a Stamp>,
    /// Letter, once it is on screen
    pub letter: Option<LetterText<'a>>,
    /// Whether narration controls are offered
    pub narration_available: bool,
}

/// Plays the reveal for one decoded postcard
pub struct ViewerController {
    record: PostcardRecord,
    sequencer: RevealSequencer,
    narration: NarrationSession,
}

impl ViewerController {
    /// Open a postcard and start its reveal.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn open(record: PostcardRecord, schedule: RevealSchedule, narration: NarrationSession) -> Self {
        let sequencer = RevealSequencer::start(schedule);
        tracing::info!(run = %sequencer.run_id().0, "Opened postcard");
        Self {
            record,
            sequencer,
            narration,
        }
    }

    /// The decoded postcard
    pub fn record(&self) -> &PostcardRecord {
        &self.record
    }

    /// Current reveal stage
    pub fn stage(&self) -> Stage {
        self.sequencer.stage()
    }

    /// Watch stage changes
    pub fn subscribe(&self) -> watch::Receiver<Stage> {
        self.sequencer.subscribe()
    }

    /// Take the stage activation stream. Only the first call returns it.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<StageActivation>> {
        self.sequencer.take_events()
    }

    /// Wait for the letter stage; false if the reveal was torn down first
    pub async fn wait_revealed(&self) -> bool {
        self.sequencer.wait_finished().await
    }

    /// Whether narration controls are offered right now
    pub fn narration_available(&self) -> bool {
        self.sequencer.narration_eligible() && self.narration.is_supported()
    }

    /// Snapshot of what should be on screen
    pub fn frame(&self) -> ViewerFrame<'_> {
        let stage = self.stage();
        let visibility = stage.visibility();
        ViewerFrame {
            stage,
            visibility,
            photo: self
                .record
                .photo
                .as_deref()
                .filter(|_| visibility.photo),
            stamp: self.record.stamp.as_ref().filter(|_| visibility.stamp),
            letter: visibility.letter.then(|| LetterText::new(&self.record)),
            narration_available: self.narration_available(),
        }
    }

    /// Read the message aloud, or resume a paused reading.
    ///
    /// Returns `Ok(false)` without speaking before the letter is revealed
    /// or when speech output is unavailable.
    pub fn play_narration(&mut self, callbacks: NarrationCallbacks) -> Result<bool> {
        if !self.narration_available() {
            tracing::debug!(stage = ?self.stage(), "Narration not available yet");
            return Ok(false);
        }
        self.narration.play(&self.record.message, callbacks)?;
        Ok(true)
    }

    /// Pause narration
    pub fn pause_narration(&mut self) {
        self.narration.pause();
    }

    /// Stop narration
    pub fn stop_narration(&mut self) {
        self.narration.stop();
    }

    /// Narration state
    pub fn narration_state(&self) -> NarrationState {
        self.narration.state()
    }

    /// Cancel pending stages and silence narration. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        self.sequencer.cancel();
        self.narration.stop();
    }
}

impl Drop for ViewerController {
    fn drop(&mut self) {
        self.teardown();
    }
}
