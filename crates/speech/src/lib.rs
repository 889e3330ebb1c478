//! Speech output for recognized gestures.
//!
//! The engine itself is a black box that speaks a string and blocks until it
//! is done. [`SpeechDispatcher`] keeps that blocking call off the frame loop.

mod dispatcher;
mod engine;

pub use dispatcher::{SpeechDispatcher, SpeechPolicy};
pub use engine::{CommandSpeechEngine, NullSpeechEngine, SpeechEngine, SpeechEngineRef};

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("speech engine unavailable: {0}")]
    Unavailable(String),
    #[error("speech failed: {0}")]
    Failed(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SpeechError>;
