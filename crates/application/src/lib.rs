mod constants;
mod frame_loop;
mod recognizer;
mod settings;
mod training;

pub use constants::*;
pub use frame_loop::{process_frame, FrameLoop, FrameLoopHandle, RunSummary, StopReason};
pub use recognizer::{
    Action, FrameOutcome, LoopControl, PredictionDebouncer, Recognizer, RecognizerError,
};
pub use settings::{RecognizerSettings, SettingsError};
pub use training::{
    train_from_file, train_from_file_with_rng, TrainingError, TrainingOptions,
};
