//! Video frames and the capture/detection collaborators.

use std::sync::Arc;

use crate::{LandmarkSet, Result};

/// A captured video frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Monotonic sequence number assigned by the source.
    pub seq: u64,
    /// Capture timestamp in milliseconds since epoch.
    pub ts_ms: i64,
    pub width: u32,
    pub height: u32,
    /// Packed RGB pixels (shared ownership, never copied between stages).
    pub pixels: Arc<[u8]>,
}

impl Frame {
    pub fn new(
        seq: u64,
        ts_ms: i64,
        width: u32,
        height: u32,
        pixels: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            seq,
            ts_ms,
            width,
            height,
            pixels: pixels.into(),
        }
    }

    /// A frame without pixel data, for sources that carry landmarks only.
    pub fn empty(seq: u64, ts_ms: i64) -> Self {
        Self::new(seq, ts_ms, 0, 0, Vec::new())
    }
}

/// Capture device producing frames.
pub trait FrameSource: Send {
    /// Read the next frame.
    ///
    /// `Ok(None)` means the source is exhausted and the frame loop should stop.
    fn read_frame(&mut self) -> Result<Option<Frame>>;

    /// Release the underlying device. Called once on shutdown.
    fn release(&mut self) {}
}

/// Landmark detector: zero or more hands per frame, coordinates in `[0, 1]`.
///
/// Treated as synchronous and reliable; the loop does not retry.
pub trait HandDetector: Send {
    fn name(&self) -> &str;

    fn detect(&mut self, frame: &Frame) -> Result<Vec<LandmarkSet>>;
}
