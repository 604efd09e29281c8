// SPDX-License-Identifier: MIT OR Apache-2.0
//! Stage-duration table for the reveal.

use crate::stage::Stage;
use std::time::Duration;
use thiserror::Error;

/// Number of timed transitions (every stage after `Sealed`)
pub const TRANSITION_COUNT: usize = 4;

/// Default durations in milliseconds: envelope-open, bouquet, photo, letter
pub const DEFAULT_DURATIONS_MS: [u64; TRANSITION_COUNT] = [2000, 1000, 1000, 1000];

/// Error when building a schedule from untrusted input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    /// Wrong number of durations
    #[error("Expected {expected} stage durations, found {found}")]
    WrongLength {
        /// Required count
        expected: usize,
        /// Supplied count
        found: usize,
    },
}

/// Ordered stage durations with precomputed activation offsets.
///
/// Stage *i* (1-indexed) activates at the sum of the first *i* durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealSchedule {
    durations: [Duration; TRANSITION_COUNT],
    offsets: [Duration; TRANSITION_COUNT],
}

impl RevealSchedule {
    /// Create a schedule from four durations
    pub fn new(durations: [Duration; TRANSITION_COUNT]) -> Self {
        let mut offsets = [Duration::ZERO; TRANSITION_COUNT];
        let mut total = Duration::ZERO;
        for (offset, duration) in offsets.iter_mut().zip(durations) {
            total = total.saturating_add(duration);
            *offset = total;
        }

        Self { durations, offsets }
    }

    /// Create a schedule from four millisecond durations
    pub fn from_millis(millis: [u64; TRANSITION_COUNT]) -> Self {
        Self::new(millis.map(Duration::from_millis))
    }

    /// Create a schedule from a slice of millisecond durations
    pub fn try_from_millis(millis: &[u64]) -> Result<Self, ScheduleError> {
        let fixed: [u64; TRANSITION_COUNT] =
            millis.try_into().map_err(|_| ScheduleError::WrongLength {
                expected: TRANSITION_COUNT,
                found: millis.len(),
            })?;
        Ok(Self::from_millis(fixed))
    }

    /// Durations in stage order
    pub fn durations(&self) -> [Duration; TRANSITION_COUNT] {
        self.durations
    }

    /// Durations in milliseconds, saturating at `u64::MAX`
    pub fn durations_ms(&self) -> [u64; TRANSITION_COUNT] {
        self.durations
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    /// Activation offsets for stages 1 through 4
    pub fn offsets(&self) -> [Duration; TRANSITION_COUNT] {
        self.offsets
    }

    /// Time after start at which a stage becomes active
    pub fn activation_offset(&self, stage: Stage) -> Duration {
        match stage.index() {
            0 => Duration::ZERO,
            i => self.offsets[usize::from(i) - 1],
        }
    }

    /// Time at which the terminal stage activates
    pub fn total(&self) -> Duration {
        self.offsets[TRANSITION_COUNT - 1]
    }

    /// Stage that is active after `elapsed` time
    pub fn stage_at(&self, elapsed: Duration) -> Stage {
        let reached = self.offsets.iter().take_while(|o| **o <= elapsed).count();
        Stage::ALL[reached]
    }
}

impl Default for RevealSchedule {
    fn default() -> Self {
        Self::from_millis(DEFAULT_DURATIONS_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_default_offsets() {
        let schedule = RevealSchedule::default();
        assert_eq!(schedule.offsets(), [ms(2000), ms(3000), ms(4000), ms(5000)]);
        assert_eq!(schedule.total(), ms(5000));
        assert_eq!(schedule.activation_offset(Stage::Sealed), Duration::ZERO);
        assert_eq!(schedule.activation_offset(Stage::Bouquet), ms(3000));
        assert_eq!(schedule.durations_ms(), DEFAULT_DURATIONS_MS);
    }

    #[test]
    fn test_stage_at_boundaries() {
        let schedule = RevealSchedule::default();
        assert_eq!(schedule.stage_at(Duration::ZERO), Stage::Sealed);
        assert_eq!(schedule.stage_at(ms(1999)), Stage::Sealed);
        assert_eq!(schedule.stage_at(ms(2000)), Stage::EnvelopeOpen);
        assert_eq!(schedule.stage_at(ms(2500)), Stage::EnvelopeOpen);
        assert_eq!(schedule.stage_at(ms(3000)), Stage::Bouquet);
        assert_eq!(schedule.stage_at(ms(4999)), Stage::Photo);
        assert_eq!(schedule.stage_at(ms(5000)), Stage::Letter);
        assert_eq!(schedule.stage_at(ms(60_000)), Stage::Letter);
    }

    #[test]
    fn test_zero_durations_collapse_to_start() {
        let schedule = RevealSchedule::from_millis([0, 0, 0, 0]);
        assert_eq!(schedule.stage_at(Duration::ZERO), Stage::Letter);
    }

    #[test]
    fn test_try_from_millis_checks_length() {
        assert_eq!(
            RevealSchedule::try_from_millis(&[100, 200]),
            Err(ScheduleError::WrongLength {
                expected: 4,
                found: 2
            })
        );
        let schedule = RevealSchedule::try_from_millis(&[10, 20, 30, 40]).unwrap();
        assert_eq!(schedule.total(), ms(100));
    }
}
