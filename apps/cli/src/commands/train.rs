use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use handsign_application::{train_from_file, train_from_file_with_rng, TrainingOptions};
use handsign_models::ModelKind;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::Cli;

#[derive(Args)]
pub struct TrainCommand {
    /// Dataset file ({"data": [[...]], "labels": [...]})
    #[arg(short, long)]
    pub dataset: PathBuf,

    /// Artifact to write (default: the models directory entry for --kind)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Model the artifact is for when --output is not given
    #[arg(long, default_value = "alphabet")]
    pub kind: ModelKind,

    /// Feature vector length to keep
    #[arg(long, default_value_t = handsign_application::DEFAULT_TARGET_LENGTH)]
    pub target_length: usize,

    /// Held-out fraction per label
    #[arg(long, default_value_t = 0.2)]
    pub test_size: f64,

    /// Number of trees
    #[arg(long, default_value_t = 100)]
    pub trees: usize,

    /// Seed for the split and the forest (default: random)
    #[arg(long)]
    pub seed: Option<u64>,
}

impl TrainCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let output = match &self.output {
            Some(path) => path.clone(),
            None => super::catalog(cli, None).model_path(self.kind),
        };

        let mut options = TrainingOptions {
            target_length: self.target_length,
            test_fraction: self.test_size,
            ..Default::default()
        };
        options.forest.n_trees = self.trees;
        options.forest.seed = self.seed;

        let report = match self.seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                train_from_file_with_rng(&self.dataset, &output, &options, &mut rng)
            }
            None => train_from_file(&self.dataset, &output, &options),
        }
        .with_context(|| format!("training from {}", self.dataset.display()))?;

        println!("{report}");
        tracing::info!(
            path = %output.display(),
            train = report.train_samples,
            test = report.test_samples,
            "Model saved"
        );
        Ok(())
    }
}
