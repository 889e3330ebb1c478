//! Timer-driven capture loop.
//!
//! Every tick reads one frame, runs the hand detector and feeds the result to
//! the [`Recognizer`]. Actions from the user interface are drained between
//! ticks on the same task, so the recognizer is never shared.

use std::time::Duration;

use handsign_landmarks::{Frame, FrameSource, HandDetector};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::constants::ACTION_CHANNEL_CAPACITY;
use crate::recognizer::{Action, FrameOutcome, LoopControl, Recognizer, Result};

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Shutdown,
    Cancelled,
    SourceExhausted,
}

/// Totals over one run of the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub hands: usize,
    pub spoken: usize,
    pub skipped: usize,
    pub reason: StopReason,
}

/// Sends actions to a running [`FrameLoop`].
#[derive(Debug, Clone)]
pub struct FrameLoopHandle {
    actions: mpsc::Sender<Action>,
    cancel: CancellationToken,
}

impl FrameLoopHandle {
    /// Queue an action. Returns `false` once the loop has stopped.
    pub async fn send(&self, action: Action) -> bool {
        self.actions.send(action).await.is_ok()
    }

    /// Queue an action from outside the runtime. Panics if called from
    /// within an async context.
    pub fn blocking_send(&self, action: Action) -> bool {
        self.actions.blocking_send(action).is_ok()
    }

    /// Stop the loop at the next opportunity.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

pub struct FrameLoop {
    source: Box<dyn FrameSource>,
    detector: Box<dyn HandDetector>,
    recognizer: Recognizer,
    interval: Duration,
    actions: mpsc::Receiver<Action>,
    cancel: CancellationToken,
}

impl FrameLoop {
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Box<dyn HandDetector>,
        recognizer: Recognizer,
        interval: Duration,
    ) -> (Self, FrameLoopHandle) {
        let (tx, rx) = mpsc::channel(ACTION_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();
        let frame_loop = Self {
            source,
            detector,
            recognizer,
            interval,
            actions: rx,
            cancel: cancel.clone(),
        };
        (frame_loop, FrameLoopHandle { actions: tx, cancel })
    }

    /// Run until shutdown, cancellation or source exhaustion.
    ///
    /// The frame source is released on every exit path. A capture error ends
    /// the run with that error.
    pub async fn run(self) -> Result<RunSummary> {
        let FrameLoop {
            mut source,
            mut detector,
            mut recognizer,
            interval,
            mut actions,
            cancel,
        } = self;

        tracing::info!(
            interval_ms = interval.as_millis() as u64,
            detector = detector.name(),
            model = recognizer.registry().active_kind().name(),
            "Frame loop started"
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut summary = RunSummary {
            frames: 0,
            hands: 0,
            spoken: 0,
            skipped: 0,
            reason: StopReason::Shutdown,
        };
        let mut actions_open = true;

        let result: Result<StopReason> = loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => break Ok(StopReason::Cancelled),

                action = actions.recv(), if actions_open => match action {
                    Some(action) => match recognizer.handle_action(action) {
                        Ok(LoopControl::Stop) => break Ok(StopReason::Shutdown),
                        Ok(LoopControl::Continue) => {}
                        Err(e) => tracing::warn!(?action, error = %e, "Action failed"),
                    },
                    None => actions_open = false,
                },

                _ = ticker.tick() => {
                    let frame = match source.read_frame() {
                        Ok(Some(frame)) => frame,
                        Ok(None) => break Ok(StopReason::SourceExhausted),
                        Err(e) => break Err(e.into()),
                    };
                    let outcome = process_frame(detector.as_mut(), &mut recognizer, &frame);
                    summary.frames += 1;
                    summary.hands += outcome.hands;
                    summary.spoken += outcome.spoken.len();
                    summary.skipped += outcome.skipped;
                }
            }
        };

        source.release();

        match result {
            Ok(reason) => {
                summary.reason = reason;
                tracing::info!(frames = summary.frames, reason = ?reason, "Frame loop stopped");
                Ok(summary)
            }
            Err(e) => {
                tracing::warn!(frames = summary.frames, error = %e, "Frame loop aborted");
                Err(e)
            }
        }
    }
}

/// Detect hands in `frame` and classify them.
///
/// A detector failure counts as a frame without hands.
pub fn process_frame(
    detector: &mut dyn HandDetector,
    recognizer: &mut Recognizer,
    frame: &Frame,
) -> FrameOutcome {
    match detector.detect(frame) {
        Ok(hands) => {
            let outcome = recognizer.process_hands(&hands);
            if outcome.hands > 0 {
                tracing::debug!(
                    seq = frame.seq,
                    hands = outcome.hands,
                    predictions = ?outcome.predictions,
                    "Frame classified"
                );
            }
            outcome
        }
        Err(e) => {
            tracing::warn!(seq = frame.seq, detector = detector.name(), error = %e, "Hand detection failed");
            FrameOutcome::default()
        }
    }
}
