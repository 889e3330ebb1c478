//! handsign - hand sign recognition from the command line.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod replay;

use commands::{ModelsCommand, RunCommand, TrainCommand};

/// Hand sign recognition.
///
///   - train: fit a classifier from a landmark dataset
///   - run: replay recorded landmarks through the recognizer
///   - models: show which trained models are installed
#[derive(Parser)]
#[command(name = "handsign")]
#[command(about = "Hand sign recognition toolkit")]
#[command(version)]
pub struct Cli {
    /// Models directory (default: per-user data dir)
    #[arg(long, global = true)]
    pub models_dir: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train a classifier from a dataset file
    Train(TrainCommand),
    /// Run the recognizer over a landmark recording
    Run(RunCommand),
    /// List installed models
    Models(ModelsCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,handsign=debug")),
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Train(cmd) => cmd.run(&cli),
        Commands::Run(cmd) => cmd.run(&cli).await,
        Commands::Models(cmd) => cmd.run(&cli),
    }
}
