//! Fire-and-forget speech dispatch.
//!
//! Speech engines block for the length of the utterance. Dispatching hands
//! the text to a worker thread and returns immediately so frame processing
//! never waits on audio. Nothing in flight is cancelled; shutdown only stops
//! accepting new requests.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread;

use serde::{Deserialize, Serialize};

use crate::SpeechEngineRef;

/// How overlapping speech requests are scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechPolicy {
    /// One worker per request, no bound. Utterances may overlap and finish
    /// out of order on rapid label changes.
    #[default]
    SpawnPerRequest,
    /// A single worker with a one-slot queue. A request arriving while the
    /// worker is busy replaces any request still waiting.
    LatestOnly,
}

#[derive(Default)]
struct SlotState {
    pending: Option<String>,
    closed: bool,
}

/// Single-slot queue served by the `LatestOnly` worker.
#[derive(Default)]
struct LatestSlot {
    state: Mutex<SlotState>,
    ready: Condvar,
}

/// Releases one in-flight request when dropped, including on unwind.
struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

enum Mode {
    Spawn,
    Latest(Arc<LatestSlot>),
}

/// Hands speech requests to worker threads.
pub struct SpeechDispatcher {
    engine: SpeechEngineRef,
    policy: SpeechPolicy,
    mode: Mode,
    in_flight: Arc<AtomicUsize>,
}

impl SpeechDispatcher {
    pub fn new(engine: SpeechEngineRef, policy: SpeechPolicy) -> Self {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let mode = match policy {
            SpeechPolicy::SpawnPerRequest => Mode::Spawn,
            SpeechPolicy::LatestOnly => {
                let slot = Arc::new(LatestSlot::default());
                spawn_latest_worker(Arc::clone(&engine), Arc::clone(&slot), Arc::clone(&in_flight));
                Mode::Latest(slot)
            }
        };

        tracing::debug!(engine = engine.name(), ?policy, "Speech dispatcher created");
        Self {
            engine,
            policy,
            mode,
            in_flight,
        }
    }

    pub fn policy(&self) -> SpeechPolicy {
        self.policy
    }

    /// Requests accepted but not yet finished speaking.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Queue `text` for speaking without blocking.
    pub fn dispatch(&self, text: &str) {
        match &self.mode {
            Mode::Spawn => self.spawn_one(text.to_string()),
            Mode::Latest(slot) => {
                let mut state = slot.state.lock().unwrap_or_else(PoisonError::into_inner);
                if state.closed {
                    return;
                }
                match state.pending.replace(text.to_string()) {
                    Some(dropped) => {
                        tracing::debug!(dropped = %dropped, text, "Superseded pending speech")
                    }
                    None => {
                        self.in_flight.fetch_add(1, Ordering::SeqCst);
                    }
                }
                slot.ready.notify_one();
            }
        }
    }

    fn spawn_one(&self, text: String) {
        let engine = Arc::clone(&self.engine);
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let guard = InFlightGuard(Arc::clone(&self.in_flight));

        // On spawn failure the closure, and the guard with it, is dropped.
        let spawned = thread::Builder::new()
            .name("speech".into())
            .spawn(move || {
                let _guard = guard;
                speak_logged(engine.as_ref(), &text);
            });

        if let Err(e) = spawned {
            tracing::warn!(error = %e, "Failed to spawn speech worker");
        }
    }
}

impl Drop for SpeechDispatcher {
    fn drop(&mut self) {
        if let Mode::Latest(slot) = &self.mode {
            let mut state = slot.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.closed = true;
            slot.ready.notify_all();
        }
    }
}

fn speak_logged(engine: &dyn crate::SpeechEngine, text: &str) {
    tracing::debug!(engine = engine.name(), text, "Speaking");
    if let Err(e) = engine.speak(text) {
        tracing::warn!(engine = engine.name(), text, error = %e, "Speech failed");
    }
}

fn spawn_latest_worker(engine: SpeechEngineRef, slot: Arc<LatestSlot>, in_flight: Arc<AtomicUsize>) {
    let spawned = thread::Builder::new()
        .name("speech-latest".into())
        .spawn(move || loop {
            let text = {
                let mut state = slot.state.lock().unwrap_or_else(PoisonError::into_inner);
                while state.pending.is_none() && !state.closed {
                    state = slot.ready.wait(state).unwrap_or_else(PoisonError::into_inner);
                }
                match state.pending.take() {
                    Some(text) => text,
                    None => break,
                }
            };
            let _guard = InFlightGuard(Arc::clone(&in_flight));
            // A panicking engine must not take the only worker down with it.
            let spoke = panic::catch_unwind(AssertUnwindSafe(|| {
                speak_logged(engine.as_ref(), &text)
            }));
            if spoke.is_err() {
                tracing::warn!(engine = engine.name(), text, "Speech engine panicked");
            }
        });

    if let Err(e) = spawned {
        tracing::warn!(error = %e, "Failed to spawn speech worker");
    }
}
