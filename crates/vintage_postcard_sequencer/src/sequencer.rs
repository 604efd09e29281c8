// SPDX-License-Identifier: MIT OR Apache-2.0
//! Wall-clock reveal sequencer.

use crate::schedule::RevealSchedule;
use crate::stage::Stage;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Unique identifier for one sequencer run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Create a new random run ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

/// A stage becoming active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageActivation {
    /// Stage that became active
    pub stage: Stage,
    /// Scheduled offset from the start of the run
    pub offset: Duration,
}

/// Drives one reveal off wall-clock timers.
///
/// Starting spawns a single task that sleeps until each absolute deadline,
/// publishing the current stage on a watch channel and every activation on an
/// event channel. A run happens once; build a new sequencer to replay.
/// Dropping the sequencer cancels whatever is still pending.
pub struct RevealSequencer {
    run_id: RunId,
    schedule: RevealSchedule,
    stage_rx: watch::Receiver<Stage>,
    events: Option<mpsc::UnboundedReceiver<StageActivation>>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl RevealSequencer {
    /// Start a run.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(schedule: RevealSchedule) -> Self {
        let run_id = RunId::new();
        let (stage_tx, stage_rx) = watch::channel(Stage::Sealed);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        tracing::info!(run = %run_id.0, total = ?schedule.total(), "Reveal started");

        let task = tokio::spawn(run_ladder(
            run_id,
            schedule,
            stage_tx,
            events_tx,
            cancel.clone(),
        ));

        Self {
            run_id,
            schedule,
            stage_rx,
            events: Some(events_rx),
            cancel,
            task,
        }
    }

    /// Identifier of this run
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Schedule this run follows
    pub fn schedule(&self) -> &RevealSchedule {
        &self.schedule
    }

    /// Current stage
    pub fn stage(&self) -> Stage {
        *self.stage_rx.borrow()
    }

    /// Whether narration may start
    pub fn narration_eligible(&self) -> bool {
        self.stage().narration_eligible()
    }

    /// Whether the terminal stage has been reached
    pub fn is_finished(&self) -> bool {
        self.stage().is_terminal()
    }

    /// Whether the run was cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Watch the current stage
    pub fn subscribe(&self) -> watch::Receiver<Stage> {
        self.stage_rx.clone()
    }

    /// Take the activation event stream; only the first call returns it
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<StageActivation>> {
        self.events.take()
    }

    /// Wait for the terminal stage; returns `false` if the run was cancelled first
    pub async fn wait_finished(&self) -> bool {
        let mut rx = self.stage_rx.clone();
        let finished = rx.wait_for(|stage| stage.is_terminal()).await.is_ok();
        finished
    }

    /// Cancel every pending transition. Calling this more than once is a no-op.
    pub fn cancel(&self) {
        if !self.cancel.is_cancelled() {
            tracing::debug!(run = %self.run_id.0, stage = ?self.stage(), "Reveal cancelled");
        }
        self.cancel.cancel();
        self.task.abort();
    }
}

impl Drop for RevealSequencer {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run_ladder(
    run_id: RunId,
    schedule: RevealSchedule,
    stage_tx: watch::Sender<Stage>,
    events_tx: mpsc::UnboundedSender<StageActivation>,
    cancel: CancellationToken,
) {
    let started = Instant::now();

    for (stage, offset) in Stage::ALL[1..].iter().copied().zip(schedule.offsets()) {
        tokio::select! {
            biased;
            () = cancel.cancelled() => return,
            () = tokio::time::sleep_until(started + offset) => {}
        }

        if cancel.is_cancelled() {
            return;
        }

        stage_tx.send_replace(stage);
        // The receiver may have been dropped by a caller that only watches stages
        let _ = events_tx.send(StageActivation { stage, offset });
        tracing::debug!(run = %run_id.0, stage = stage.index(), "Stage activated");
    }

    tracing::info!(run = %run_id.0, "Reveal finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::RevealClock;
    use pretty_assertions::assert_eq;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[tokio::test(start_paused = true)]
    async fn test_stages_fire_in_order_and_on_time() {
        let started = Instant::now();
        let mut sequencer = RevealSequencer::start(RevealSchedule::default());
        let mut events = sequencer.take_events().unwrap();
        assert_eq!(sequencer.stage(), Stage::Sealed);

        let mut seen = Vec::new();
        while let Some(activation) = events.recv().await {
            let observed = started.elapsed();
            assert!(observed >= activation.offset);
            seen.push((activation.stage.index(), activation.offset));
        }

        assert_eq!(
            seen,
            vec![(1, ms(2000)), (2, ms(3000)), (3, ms(4000)), (4, ms(5000))]
        );
        assert!(sequencer.is_finished());
        assert!(sequencer.narration_eligible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_advances_early() {
        let sequencer = RevealSequencer::start(RevealSchedule::default());

        tokio::time::sleep(ms(1999)).await;
        assert_eq!(sequencer.stage(), Stage::Sealed);
        tokio::time::sleep(ms(2)).await;
        assert_eq!(sequencer.stage(), Stage::EnvelopeOpen);
        assert!(!sequencer.narration_eligible());

        tokio::time::sleep(ms(1000)).await;
        assert_eq!(sequencer.stage(), Stage::Bouquet);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_at_2500ms_stops_later_stages() {
        let mut sequencer = RevealSequencer::start(RevealSchedule::default());
        let mut events = sequencer.take_events().unwrap();
        let watcher = sequencer.subscribe();

        tokio::time::sleep(ms(2500)).await;
        assert_eq!(sequencer.stage(), Stage::EnvelopeOpen);
        drop(sequencer);

        tokio::time::sleep(ms(10_000)).await;

        let mut seen = Vec::new();
        while let Some(activation) = events.recv().await {
            seen.push(activation.stage);
        }
        assert_eq!(seen, vec![Stage::EnvelopeOpen]);
        assert_eq!(*watcher.borrow(), Stage::EnvelopeOpen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_is_idempotent() {
        let sequencer = RevealSequencer::start(RevealSchedule::default());
        sequencer.cancel();
        sequencer.cancel();
        assert!(sequencer.is_cancelled());
        assert!(!sequencer.wait_finished().await);
        assert_eq!(sequencer.stage(), Stage::Sealed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_finished_and_fresh_run_restarts() {
        let first = RevealSequencer::start(RevealSchedule::from_millis([10, 10, 10, 10]));
        assert!(first.wait_finished().await);
        assert_eq!(first.stage(), Stage::Letter);

        let second = RevealSequencer::start(RevealSchedule::from_millis([10, 10, 10, 10]));
        assert_eq!(second.stage(), Stage::Sealed);
        assert_ne!(first.run_id(), second.run_id());
    }

    #[tokio::test(start_paused = true)]
    async fn test_agrees_with_frame_driven_clock() {
        // Offsets 705, 755, 2005, 2005 never land on a 16 ms frame boundary
        let schedule = RevealSchedule::from_millis([705, 50, 1250, 0]);
        let mut sequencer = RevealSequencer::start(schedule);
        let mut events = sequencer.take_events().unwrap();
        let mut clock = RevealClock::new(schedule);

        let mut expected = Vec::new();
        while !clock.is_finished() {
            expected.extend(clock.advance(ms(16)));
            tokio::time::sleep(ms(16)).await;
            assert_eq!(sequencer.stage(), clock.stage(), "at {:?}", clock.elapsed());
        }

        let mut seen = Vec::new();
        while let Ok(activation) = events.try_recv() {
            seen.push(activation);
        }
        assert_eq!(seen, expected);
        assert_eq!(seen.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_durations_still_fire_every_stage() {
        let mut sequencer = RevealSequencer::start(RevealSchedule::from_millis([0, 0, 0, 0]));
        let mut events = sequencer.take_events().unwrap();
        assert!(sequencer.take_events().is_none());

        let mut seen = Vec::new();
        while let Some(activation) = events.recv().await {
            seen.push(activation.stage.index());
        }
        assert_eq!(seen, vec![1, 2, 3, 4]);
    }
}
