// SPDX-License-Identifier: MIT OR Apache-2.0
//! Read-aloud narration of the postcard message.
//!
//! This module provides:
//! - The [`NarrationEngine`] contract a speech backend implements
//! - [`NarrationSession`], which owns the one active utterance
//! - Voice settings and preferred-voice selection
//! - Two built-in engines: [`UnsupportedNarrator`] and [`TranscriptNarrator`]
//!
//! The speech output is a single shared resource: at most one utterance is in
//! flight, and the session cancels it before starting another. Every
//! utterance carries its own id so late callbacks from a replaced utterance
//! are ignored.

use crate::error::{AppError, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtteranceId(pub Uuid);

impl UtteranceId {
    /// Create a new random utterance ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UtteranceId {
    fn default() -> Self {
        Self::new()
    }
}

/// Externally observable narration state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NarrationState {
    /// Nothing playing
    #[default]
    Idle,
    /// Speaking
    Playing,
    /// Paused mid-utterance
    Paused,
}

/// Voice configuration for narration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    /// Speaking rate (1.0 = normal)
    pub rate: f32,
    /// Voice pitch (1.0 = normal)
    pub pitch: f32,
    /// Output volume, 0.0 to 1.0
    pub volume: f32,
    /// Name fragments of voices to prefer, in priority order
    pub preferred_voices: Vec<String>,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            rate: 0.9,
            pitch: 1.1,
            volume: 1.0,
            preferred_voices: ["Female", "Natural", "Samantha", "Victoria"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl VoiceSettings {
    /// Pick a voice: the first whose name contains any preferred fragment,
    /// otherwise the first available one
    pub fn select_voice(&self, available: &[String]) -> Option<String> {
        available
            .iter()
            .find(|voice| {
                self.preferred_voices
                    .iter()
                    .any(|fragment| voice.contains(fragment.as_str()))
            })
            .or_else(|| available.first())
            .cloned()
    }
}

/// One request to speak
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    /// Utterance id
    pub id: UtteranceId,
    /// Text to speak
    pub text: String,
    /// Chosen voice, if the engine offered any
    pub voice: Option<String>,
    /// Speaking rate
    pub rate: f32,
    /// Voice pitch
    pub pitch: f32,
    /// Output volume
    pub volume: f32,
}

type Callback = Arc<dyn Fn() + Send + Sync>;
type ErrorCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Callbacks for one utterance
#[derive(Clone, Default)]
pub struct NarrationCallbacks {
    on_start: Option<Callback>,
    on_end: Option<Callback>,
    on_error: Option<ErrorCallback>,
}

impl NarrationCallbacks {
    /// No callbacks
    pub fn new() -> Self {
        Self::default()
    }

    /// Called when speech starts
    pub fn on_start(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_start = Some(Arc::new(f));
        self
    }

    /// Called when speech finishes normally
    pub fn on_end(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_end = Some(Arc::new(f));
        self
    }

    /// Called when speech fails
    pub fn on_error(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for NarrationCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NarrationCallbacks")
            .field("on_start", &self.on_start.is_some())
            .field("on_end", &self.on_end.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

#[derive(Debug, Default)]
struct SessionShared {
    state: NarrationState,
    current: Option<UtteranceId>,
    callbacks: NarrationCallbacks,
}

/// Handle an engine uses to report progress of one utterance.
///
/// Reports for an utterance that is no longer current are dropped.
#[derive(Clone)]
pub struct UtteranceEvents {
    id: UtteranceId,
    shared: Arc<Mutex<SessionShared>>,
}

impl UtteranceEvents {
    /// Utterance these events belong to
    pub fn id(&self) -> UtteranceId {
        self.id
    }

    /// Whether this utterance is still the session's current one
    pub fn is_current(&self) -> bool {
        self.shared.lock().current == Some(self.id)
    }

    /// Speech has started
    pub fn started(&self) {
        let callback = {
            let mut shared = self.shared.lock();
            if shared.current != Some(self.id) {
                return;
            }
            shared.state = NarrationState::Playing;
            shared.callbacks.on_start.clone()
        };
        tracing::debug!("Narration started");
        if let Some(callback) = callback {
            callback();
        }
    }

    /// Speech has finished
    pub fn ended(&self) {
        let callback = {
            let mut shared = self.shared.lock();
            if shared.current != Some(self.id) {
                return;
            }
            shared.state = NarrationState::Idle;
            shared.current = None;
            shared.callbacks.on_end.clone()
        };
        tracing::debug!("Narration ended");
        if let Some(callback) = callback {
            callback();
        }
    }

    /// Speech failed
    pub fn failed(&self, reason: &str) {
        let callback = {
            let mut shared = self.shared.lock();
            if shared.current != Some(self.id) {
                return;
            }
            shared.state = NarrationState::Idle;
            shared.current = None;
            shared.callbacks.on_error.clone()
        };
        tracing::warn!("Narration failed: {reason}");
        if let Some(callback) = callback {
            callback(reason);
        }
    }
}

impl fmt::Debug for UtteranceEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UtteranceEvents").field(&self.id).finish()
    }
}

/// A text-to-speech backend
pub trait NarrationEngine: Send {
    /// Whether speech output is available at all
    fn is_supported(&self) -> bool;

    /// Voices the engine offers
    fn voices(&self) -> Vec<String> {
        Vec::new()
    }

    /// Begin speaking; progress is reported through `events`
    fn speak(&mut self, utterance: Utterance, events: UtteranceEvents) -> Result<()>;

    /// Pause output
    fn pause(&mut self);

    /// Resume paused output
    fn resume(&mut self);

    /// Silence and discard anything queued. Must be safe when idle.
    fn cancel(&mut self);
}

/// Engine for systems without speech output
#[derive(Debug, Default)]
pub struct UnsupportedNarrator;

impl NarrationEngine for UnsupportedNarrator {
    fn is_supported(&self) -> bool {
        false
    }

    fn speak(&mut self, _utterance: Utterance, _events: UtteranceEvents) -> Result<()> {
        Err(AppError::UnsupportedCapability("speech synthesis"))
    }

    fn pause(&mut self) {}

    fn resume(&mut self) {}

    fn cancel(&mut self) {}
}

/// Engine that writes the message to the log instead of speaking it
#[derive(Debug, Default)]
pub struct TranscriptNarrator {
    transcript: Vec<String>,
}

impl TranscriptNarrator {
    /// Create an empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything narrated so far
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }
}

impl NarrationEngine for TranscriptNarrator {
    fn is_supported(&self) -> bool {
        true
    }

    fn speak(&mut self, utterance: Utterance, events: UtteranceEvents) -> Result<()> {
        events.started();
        tracing::info!(rate = utterance.rate, pitch = utterance.pitch, "Narrating: {}", utterance.text);
        self.transcript.push(utterance.text);
        events.ended();
        Ok(())
    }

    fn pause(&mut self) {}

    fn resume(&mut self) {}

    fn cancel(&mut self) {}
}

/// The one narration channel owned by a viewer
pub struct NarrationSession {
    engine: Box<dyn NarrationEngine>,
    voice: VoiceSettings,
    shared: Arc<Mutex<SessionShared>>,
}

impl NarrationSession {
    /// Create a session around an engine
    pub fn new(engine: Box<dyn NarrationEngine>, voice: VoiceSettings) -> Self {
        if !engine.is_supported() {
            tracing::warn!("Speech synthesis not supported; narration controls hidden");
        }
        Self {
            engine,
            voice,
            shared: Arc::new(Mutex::new(SessionShared::default())),
        }
    }

    /// Whether narration controls should be offered
    pub fn is_supported(&self) -> bool {
        self.engine.is_supported()
    }

    /// Current state
    pub fn state(&self) -> NarrationState {
        self.shared.lock().state
    }

    /// Id of the utterance in flight
    pub fn current(&self) -> Option<UtteranceId> {
        self.shared.lock().current
    }

    /// Speak `text`, cancelling anything already in flight.
    ///
    /// Without speech support nothing is spoken: `on_error` is told why and
    /// `Ok(None)` is returned.
    pub fn speak(
        &mut self,
        text: &str,
        callbacks: NarrationCallbacks,
    ) -> Result<Option<UtteranceId>> {
        self.stop();

        if !self.engine.is_supported() {
            tracing::debug!("Narration skipped, speech synthesis not supported");
            if let Some(on_error) = &callbacks.on_error {
                on_error("speech synthesis not supported");
            }
            return Ok(None);
        }

        let id = UtteranceId::new();
        {
            let mut shared = self.shared.lock();
            shared.current = Some(id);
            shared.callbacks = callbacks;
        }

        let utterance = Utterance {
            id,
            text: text.to_string(),
            voice: self.voice.select_voice(&self.engine.voices()),
            rate: self.voice.rate,
            pitch: self.voice.pitch,
            volume: self.voice.volume,
        };
        let events = UtteranceEvents {
            id,
            shared: Arc::clone(&self.shared),
        };

        if let Err(err) = self.engine.speak(utterance, events.clone()) {
            events.failed(&err.to_string());
            return Err(err);
        }
        Ok(Some(id))
    }

    /// Play button: resume when paused, otherwise start speaking `text`
    pub fn play(&mut self, text: &str, callbacks: NarrationCallbacks) -> Result<()> {
        if self.state() == NarrationState::Paused {
            self.resume();
            return Ok(());
        }
        self.speak(text, callbacks).map(|_| ())
    }

    /// Pause the current utterance; no-op unless playing
    pub fn pause(&mut self) {
        if self.state() != NarrationState::Playing {
            return;
        }
        self.engine.pause();
        self.shared.lock().state = NarrationState::Paused;
    }

    /// Resume a paused utterance; no-op unless paused
    pub fn resume(&mut self) {
        if self.state() != NarrationState::Paused {
            return;
        }
        self.engine.resume();
        self.shared.lock().state = NarrationState::Playing;
    }

    /// Silence and forget the current utterance. Safe to call when idle.
    pub fn stop(&mut self) {
        // Forget the utterance first so an interrupt reported by the engine is ignored
        {
            let mut shared = self.shared.lock();
            shared.current = None;
            shared.state = NarrationState::Idle;
            shared.callbacks = NarrationCallbacks::default();
        }
        self.engine.cancel();
    }
}

impl Drop for NarrationSession {
    fn drop(&mut self) {
        self.stop();
    }
}
