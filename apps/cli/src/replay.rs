//! Landmark recordings as a stand-in for camera plus detector.
//!
//! One JSON array per line, one entry per detected hand, each hand a list of
//! `[x, y]` points:
//!
//! ```text
//! [[[0.41, 0.62], [0.44, 0.58], ...]]
//! []
//! ```
//!
//! Blank lines are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use handsign_landmarks::{Frame, FrameSource, HandDetector, LandmarkError, LandmarkSet};

type Slot = Arc<Mutex<Vec<LandmarkSet>>>;

pub struct ReplaySource {
    lines: Lines<BufReader<File>>,
    line_no: usize,
    seq: u64,
    slot: Slot,
}

/// Hands back the landmarks [`ReplaySource`] read for the current frame.
pub struct ReplayDetector {
    slot: Slot,
}

pub fn open(path: &Path) -> std::io::Result<(ReplaySource, ReplayDetector)> {
    let file = File::open(path)?;
    let slot = Slot::default();
    let source = ReplaySource {
        lines: BufReader::new(file).lines(),
        line_no: 0,
        seq: 0,
        slot: Arc::clone(&slot),
    };
    Ok((source, ReplayDetector { slot }))
}

fn parse_line(line: &str, line_no: usize) -> handsign_landmarks::Result<Vec<LandmarkSet>> {
    serde_json::from_str(line)
        .map_err(|e| LandmarkError::Capture(format!("line {line_no}: {e}")))
}

impl FrameSource for ReplaySource {
    fn read_frame(&mut self) -> handsign_landmarks::Result<Option<Frame>> {
        loop {
            let Some(line) = self.lines.next() else {
                return Ok(None);
            };
            self.line_no += 1;
            let line = line.map_err(|e| LandmarkError::Capture(e.to_string()))?;
            if line.trim().is_empty() {
                continue;
            }

            let hands = parse_line(&line, self.line_no)?;
            *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = hands;
            self.seq += 1;
            return Ok(Some(Frame::empty(self.seq, handsign_events::now_ms())));
        }
    }

    fn release(&mut self) {
        tracing::debug!(frames = self.seq, "Replay closed");
    }
}

impl HandDetector for ReplayDetector {
    fn name(&self) -> &str {
        "replay"
    }

    fn detect(&mut self, _frame: &Frame) -> handsign_landmarks::Result<Vec<LandmarkSet>> {
        Ok(std::mem::take(
            &mut *self.slot.lock().unwrap_or_else(PoisonError::into_inner),
        ))
    }
}
