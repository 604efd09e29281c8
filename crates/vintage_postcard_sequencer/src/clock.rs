// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frame-driven reveal clock.

use crate::schedule::RevealSchedule;
use crate::sequencer::StageActivation;
use crate::stage::Stage;
use std::time::Duration;

/// Pure reveal state advanced by elapsed time deltas.
///
/// Useful where the caller already owns a frame loop. Each boundary fires
/// exactly once; the clock never loops and never rewinds.
#[derive(Debug, Clone)]
pub struct RevealClock {
    schedule: RevealSchedule,
    elapsed: Duration,
    stage: Stage,
}

impl RevealClock {
    /// Create a clock at stage 0
    pub fn new(schedule: RevealSchedule) -> Self {
        Self {
            schedule,
            elapsed: Duration::ZERO,
            stage: Stage::Sealed,
        }
    }

    /// Advance by `delta` and return the stages reached, in order
    pub fn advance(&mut self, delta: Duration) -> Vec<StageActivation> {
        self.elapsed = self.elapsed.saturating_add(delta);

        let mut fired = Vec::new();
        while let Some(next) = self.stage.next() {
            let offset = self.schedule.activation_offset(next);
            if offset > self.elapsed {
                break;
            }
            self.stage = next;
            fired.push(StageActivation {
                stage: next,
                offset,
            });
        }

        fired
    }

    /// Current stage
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Total time fed into the clock
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Whether the terminal stage has been reached
    pub fn is_finished(&self) -> bool {
        self.stage.is_terminal()
    }

    /// Time left until the next stage, if any
    pub fn until_next(&self) -> Option<Duration> {
        self.stage
            .next()
            .map(|next| self.schedule.activation_offset(next).saturating_sub(self.elapsed))
    }

    /// The schedule driving this clock
    pub fn schedule(&self) -> &RevealSchedule {
        &self.schedule
    }
}

impl Default for RevealClock {
    fn default() -> Self {
        Self::new(RevealSchedule::default())
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
    fn test_sixty_fps_run_is_monotonic() {
        let mut clock = RevealClock::default();
        let mut seen = vec![clock.stage().index()];

        for _ in 0..400 {
            for activation in clock.advance(ms(16)) {
                seen.push(activation.stage.index());
            }
        }

        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        assert!(clock.is_finished());
    }

    #[test]
    fn test_never_fires_early() {
        let mut clock = RevealClock::default();
        assert!(clock.advance(ms(1999)).is_empty());
        assert_eq!(clock.until_next(), Some(ms(1)));

        let fired = clock.advance(ms(1));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].stage, Stage::EnvelopeOpen);
        assert_eq!(fired[0].offset, ms(2000));
    }

    #[test]
    fn test_large_delta_fires_each_stage_once_in_order() {
        let mut clock = RevealClock::default();
        let fired: Vec<Stage> = clock.advance(ms(10_000)).into_iter().map(|a| a.stage).collect();
        assert_eq!(
            fired,
            vec![Stage::EnvelopeOpen, Stage::Bouquet, Stage::Photo, Stage::Letter]
        );

        assert!(clock.advance(ms(10_000)).is_empty());
        assert_eq!(clock.until_next(), None);
    }
}
