mod models;
mod run;
mod train;

pub use models::ModelsCommand;
pub use run::RunCommand;
pub use train::TrainCommand;

use handsign_models::ModelCatalog;

use crate::Cli;

/// Catalog from `--models-dir`, or `fallback`, or the per-user default.
fn catalog(cli: &Cli, fallback: Option<&std::path::Path>) -> ModelCatalog {
    match cli.models_dir.as_deref().or(fallback) {
        Some(dir) => ModelCatalog::new(dir),
        None => ModelCatalog::default(),
    }
}
