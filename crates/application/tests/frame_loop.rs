mod common;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::{hand, harness, registry};
use handsign_application::{Action, FrameLoop, StopReason};
use handsign_events::{event_names, ModelChangedEvent};
use handsign_landmarks::{Frame, FrameSource, HandDetector, LandmarkError, LandmarkSet};
use handsign_models::ModelKind;

enum End {
    Exhaust,
    Idle,
    Fail,
}

/// Plays back a fixed list of per-frame hands, then ends, idles or fails.
struct ScriptedCamera {
    frames: VecDeque<Vec<LandmarkSet>>,
    slot: Arc<Mutex<Vec<LandmarkSet>>>,
    end: End,
    seq: u64,
    released: Arc<AtomicBool>,
}

impl FrameSource for ScriptedCamera {
    fn read_frame(&mut self) -> handsign_landmarks::Result<Option<Frame>> {
        let hands = match (self.frames.pop_front(), &self.end) {
            (Some(hands), _) => hands,
            (None, End::Exhaust) => return Ok(None),
            (None, End::Idle) => Vec::new(),
            (None, End::Fail) => return Err(LandmarkError::Capture("device unplugged".into())),
        };
        *self.slot.lock().unwrap() = hands;
        self.seq += 1;
        Ok(Some(Frame::empty(self.seq, 0)))
    }

    fn release(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

/// Reports whatever hands the camera scripted for the current frame.
struct SlotDetector {
    slot: Arc<Mutex<Vec<LandmarkSet>>>,
}

impl HandDetector for SlotDetector {
    fn name(&self) -> &str {
        "scripted"
    }

    fn detect(&mut self, _frame: &Frame) -> handsign_landmarks::Result<Vec<LandmarkSet>> {
        Ok(std::mem::take(&mut *self.slot.lock().unwrap()))
    }
}

fn scripted(
    frames: Vec<Vec<LandmarkSet>>,
    end: End,
    released: &Arc<AtomicBool>,
) -> (Box<dyn FrameSource>, Box<dyn HandDetector>) {
    let slot = Arc::new(Mutex::new(Vec::new()));
    let camera = ScriptedCamera {
        frames: frames.into(),
        slot: Arc::clone(&slot),
        end,
        seq: 0,
        released: Arc::clone(released),
    };
    (Box::new(camera), Box::new(SlotDetector { slot }))
}

#[tokio::test]
async fn test_runs_until_source_exhausted() {
    let released = Arc::new(AtomicBool::new(false));
    let frames = vec![
        vec![hand(0)],
        vec![hand(0)],
        vec![],
        vec![hand(1)],
        vec![hand(1), hand(0)],
    ];
    let (source, detector) = scripted(frames, End::Exhaust, &released);
    let h = harness(registry());

    let (frame_loop, _handle) =
        FrameLoop::new(source, detector, h.recognizer, Duration::from_millis(1));
    let summary = frame_loop.run().await.unwrap();

    assert_eq!(summary.reason, StopReason::SourceExhausted);
    assert_eq!(summary.frames, 5);
    assert_eq!(summary.hands, 5);
    assert_eq!(summary.spoken, 3);
    assert!(released.load(Ordering::SeqCst));
    assert_eq!(h.bus.events_for(event_names::LABEL_PREDICTED).len(), 5);
}

#[tokio::test]
async fn test_shutdown_action_stops_loop() {
    let released = Arc::new(AtomicBool::new(false));
    let (source, detector) = scripted(Vec::new(), End::Idle, &released);
    let h = harness(registry());

    let (frame_loop, handle) =
        FrameLoop::new(source, detector, h.recognizer, Duration::from_millis(1));
    let task = tokio::spawn(frame_loop.run());

    assert!(handle.send(Action::SetActiveModel(ModelKind::Numbers)).await);
    assert!(handle.send(Action::Shutdown).await);

    let summary = task.await.unwrap().unwrap();
    assert_eq!(summary.reason, StopReason::Shutdown);
    assert!(released.load(Ordering::SeqCst));

    let changed: Vec<ModelChangedEvent> = h.bus.payloads_for(event_names::MODEL_CHANGED);
    assert_eq!(changed.len(), 1);
    assert_eq!(changed[0].model, "numbers");
}

#[tokio::test]
async fn test_cancellation_stops_loop() {
    let released = Arc::new(AtomicBool::new(false));
    let (source, detector) = scripted(Vec::new(), End::Idle, &released);
    let h = harness(registry());

    let (frame_loop, handle) =
        FrameLoop::new(source, detector, h.recognizer, Duration::from_millis(1));
    let task = tokio::spawn(frame_loop.run());

    tokio::time::sleep(Duration::from_millis(20)).await;
    handle.cancel();

    let summary = task.await.unwrap().unwrap();
    assert_eq!(summary.reason, StopReason::Cancelled);
    assert!(summary.frames > 0);
    assert!(released.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_capture_error_releases_source() {
    let released = Arc::new(AtomicBool::new(false));
    let (source, detector) = scripted(vec![vec![hand(0)]], End::Fail, &released);
    let h = harness(registry());

    let (frame_loop, _handle) =
        FrameLoop::new(source, detector, h.recognizer, Duration::from_millis(1));
    assert!(frame_loop.run().await.is_err());
    assert!(released.load(Ordering::SeqCst));
}
