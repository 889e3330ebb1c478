use std::process::{Command, Stdio};
use std::sync::Arc;

use crate::{Result, SpeechError};

/// Text-to-speech engine.
pub trait SpeechEngine: Send + Sync {
    fn name(&self) -> &str;

    /// Speak `text`, blocking until playback finishes.
    fn speak(&self, text: &str) -> Result<()>;
}

pub type SpeechEngineRef = Arc<dyn SpeechEngine>;

/// Speaks by running an external TTS program with the text as last argument.
///
/// Works with `espeak`, `espeak-ng`, `say` (macOS) and similar tools.
#[derive(Debug, Clone)]
pub struct CommandSpeechEngine {
    program: String,
    args: Vec<String>,
}

impl CommandSpeechEngine {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// The platform's usual TTS command.
    pub fn system_default() -> Self {
        if cfg!(target_os = "macos") {
            Self::new("say", Vec::new())
        } else {
            Self::new("espeak", vec!["-v".into(), "es".into()])
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl SpeechEngine for CommandSpeechEngine {
    fn name(&self) -> &str {
        &self.program
    }

    fn speak(&self, text: &str) -> Result<()> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => SpeechError::Unavailable(self.program.clone()),
                _ => SpeechError::Io(e),
            })?;

        if !status.success() {
            return Err(SpeechError::Failed(format!(
                "{} exited with {status}",
                self.program
            )));
        }
        Ok(())
    }
}

/// Speaks nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSpeechEngine;

impl SpeechEngine for NullSpeechEngine {
    fn name(&self) -> &str {
        "null"
    }

    fn speak(&self, _text: &str) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_unavailable() {
        let engine = CommandSpeechEngine::new("handsign-no-such-tts-binary", Vec::new());
        assert!(matches!(
            engine.speak("A"),
            Err(SpeechError::Unavailable(program)) if program == "handsign-no-such-tts-binary"
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_engine_runs_program() {
        let engine = CommandSpeechEngine::new("true", Vec::new());
        assert!(engine.speak("A").is_ok());

        let failing = CommandSpeechEngine::new("false", Vec::new());
        assert!(matches!(failing.speak("A"), Err(SpeechError::Failed(_))));
    }
}
