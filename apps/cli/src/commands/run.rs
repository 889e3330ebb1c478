use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use handsign_application::{Action, FrameLoop, FrameLoopHandle, Recognizer, RecognizerSettings};
use handsign_events::LogEventBus;
use handsign_models::{ModelKind, ModelRegistry};
use handsign_speech::{
    CommandSpeechEngine, NullSpeechEngine, SpeechDispatcher, SpeechEngineRef, SpeechPolicy,
};

use crate::{replay, Cli};

#[derive(Args)]
pub struct RunCommand {
    /// Landmark recording (JSON lines, one list of hands per frame)
    #[arg(long)]
    pub replay: PathBuf,

    /// Settings file (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Model to start with
    #[arg(short, long)]
    pub model: Option<ModelKind>,

    /// Start muted
    #[arg(long)]
    pub mute: bool,

    /// Frame timer period in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Drop queued speech when a newer label arrives
    #[arg(long)]
    pub latest_only: bool,

    /// TTS program to run per utterance (default: say on macOS, espeak elsewhere)
    #[arg(long, conflicts_with = "no_tts")]
    pub tts: Option<String>,

    /// Disable the TTS program entirely
    #[arg(long)]
    pub no_tts: bool,

    /// Read actions from stdin: "model <name>", "mute", "quit"
    #[arg(long)]
    pub interactive: bool,
}

impl RunCommand {
    fn settings(&self, cli: &Cli) -> anyhow::Result<RecognizerSettings> {
        let mut settings = match &self.config {
            Some(path) => RecognizerSettings::load(path)
                .with_context(|| format!("reading settings from {}", path.display()))?,
            None => RecognizerSettings::default(),
        };

        if let Some(kind) = self.model {
            settings.default_model = kind;
        }
        if self.mute {
            settings.speech_enabled = false;
        }
        if let Some(ms) = self.interval_ms {
            settings.frame_interval_ms = ms;
        }
        if self.latest_only {
            settings.speech_policy = SpeechPolicy::LatestOnly;
        }
        if let Some(dir) = &cli.models_dir {
            settings.models_dir = Some(dir.clone());
        }
        Ok(settings)
    }

    fn engine(&self) -> SpeechEngineRef {
        if self.no_tts {
            return Arc::new(NullSpeechEngine);
        }
        match &self.tts {
            Some(program) => Arc::new(CommandSpeechEngine::new(program.clone(), Vec::new())),
            None => Arc::new(CommandSpeechEngine::system_default()),
        }
    }

    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let settings = self.settings(cli)?;
        tracing::debug!(?settings, "Recognizer settings");

        let catalog = super::catalog(cli, settings.models_dir.as_deref());
        let registry = ModelRegistry::with_forest_artifacts(catalog, settings.default_model)
            .context("loading default model")?;

        let speech = SpeechDispatcher::new(self.engine(), settings.speech_policy);
        let recognizer = Recognizer::new(Arc::new(registry), speech, Arc::new(LogEventBus))
            .with_speech_enabled(settings.speech_enabled);

        let (source, detector) = replay::open(&self.replay)
            .with_context(|| format!("opening {}", self.replay.display()))?;
        let (frame_loop, handle) = FrameLoop::new(
            Box::new(source),
            Box::new(detector),
            recognizer,
            settings.frame_interval(),
        );

        let ctrl_c = handle.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupted, shutting down");
                ctrl_c.cancel();
            }
        });

        if self.interactive {
            spawn_stdin_actions(handle.clone());
        }

        let summary = frame_loop.run().await?;
        println!(
            "{} frames, {} hands, {} spoken, {} skipped ({:?})",
            summary.frames, summary.hands, summary.spoken, summary.skipped, summary.reason
        );
        Ok(())
    }
}

fn parse_action(line: &str) -> Option<Action> {
    let mut words = line.split_whitespace();
    match words.next()? {
        "model" => match ModelKind::parse(words.next()?) {
            Ok(kind) => Some(Action::SetActiveModel(kind)),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring model command");
                None
            }
        },
        "mute" | "unmute" | "toggle" => Some(Action::ToggleSpeech),
        "quit" | "exit" => Some(Action::Shutdown),
        other => {
            tracing::warn!(command = other, "Unknown command");
            None
        }
    }
}

/// Forward stdin commands to the loop from a plain thread.
fn spawn_stdin_actions(handle: FrameLoopHandle) {
    let spawned = std::thread::Builder::new()
        .name("stdin-actions".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if let Some(action) = parse_action(&line) {
                    if !handle.blocking_send(action) {
                        break;
                    }
                }
            }
        });
    if let Err(e) = spawned {
        tracing::warn!(error = %e, "Failed to start stdin reader");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_action() {
        assert_eq!(
            parse_action("model NUMEROS"),
            Some(Action::SetActiveModel(ModelKind::Numbers))
        );
        assert_eq!(parse_action("  mute "), Some(Action::ToggleSpeech));
        assert_eq!(parse_action("quit"), Some(Action::Shutdown));
        assert_eq!(parse_action("model klingon"), None);
        assert_eq!(parse_action("model"), None);
        assert_eq!(parse_action(""), None);
    }
}
