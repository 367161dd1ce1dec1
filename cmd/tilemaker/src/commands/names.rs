//! Name-only run.

use clap::Args;

use super::{create_pipeline, output_result, print_verbose, resolve_settings, RunArgs};
use crate::Cli;

/// Generate material names for a theme without rendering textures.
///
/// No preflight checks run and the web UI is not contacted.
#[derive(Args)]
pub struct NamesCommand {
    #[command(flatten)]
    args: RunArgs,
}

impl NamesCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let settings = resolve_settings(cli, &self.args)?;
        let theme = settings.theme()?;
        let credential = settings.credential()?;

        print_verbose(cli, &format!("Model: {}", settings.pipeline.completion_model));

        let pipeline = create_pipeline(&settings, credential.value())?;
        let names = pipeline.generate_names(theme).await?;
        output_result(&names, cli)
    }
}
