// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timed reveal sequencer for Vintage Postcard.
//!
//! Opening a postcard plays a fixed ladder of stages:
//! - Envelope opens
//! - Bouquet appears
//! - Photo and stamp pop up
//! - Letter slides in and narration becomes available
//!
//! ## Architecture
//!
//! The sequencer is built on:
//! - A stage-duration table with activation offsets computed up front
//! - A pure, frame-driven clock for deterministic evaluation
//! - A single tokio task that sleeps until each absolute deadline
//! - A cancellation token so teardown stops every pending transition at once

pub mod clock;
pub mod schedule;
pub mod sequencer;
pub mod stage;

pub use clock::RevealClock;
pub use schedule::{RevealSchedule, ScheduleError, DEFAULT_DURATIONS_MS};
pub use sequencer::{RevealSequencer, RunId, StageActivation};
pub use stage::{Stage, StageVisibility};
