use clap::Args;

use crate::Cli;

#[derive(Args)]
pub struct ModelsCommand {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

impl ModelsCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let catalog = super::catalog(cli, None);
        let models = catalog.list();

        if self.json {
            let entries: Vec<serde_json::Value> = models
                .iter()
                .map(|m| {
                    serde_json::json!({
                        "name": m.kind.name(),
                        "display_name": m.kind.display_name(),
                        "path": m.path,
                        "available": m.is_available,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }

        println!("Models directory: {}", catalog.dir().display());
        for m in models {
            let status = if m.is_available { "installed" } else { "missing" };
            println!(
                "  {:<10} {:<12} {:<10} {}",
                m.kind.name(),
                m.kind.display_name(),
                status,
                m.path.display()
            );
        }
        Ok(())
    }
}
