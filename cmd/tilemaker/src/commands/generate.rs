//! Full generation run.

use clap::Args;

use smarttile_tiles::{GenerationRequest, TilesError};

use super::{
    create_pipeline, output_result, print_preflight_warning, print_success, print_verbose,
    resolve_settings, RunArgs,
};
use crate::Cli;

/// Generate textures for a theme.
///
/// Checks the output folder, the web UI and the API key, then asks for five
/// material names and renders Texture0.png .. Texture4.png. Existing files
/// with those names are replaced.
///
/// Examples:
///   tilemaker generate --theme "zombie apocalypse"
///   tilemaker generate -f run.yaml --json
#[derive(Args)]
pub struct GenerateCommand {
    #[command(flatten)]
    args: RunArgs,
}

impl GenerateCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let settings = resolve_settings(cli, &self.args)?;
        let theme = settings.theme()?;
        let credential = settings.credential()?;
        let output_dir = settings.output_dir()?;

        print_verbose(cli, &format!("Theme: {}", theme));
        print_verbose(cli, &format!("Output: {}", output_dir.display()));
        print_verbose(cli, &format!("Web UI: {}", settings.pipeline.sd_url));
        print_verbose(cli, &format!("API key source: {:?}", credential.source()));

        let pipeline = create_pipeline(&settings, credential.value())?;
        let request = GenerationRequest::new(theme, credential.value(), output_dir);
        tracing::debug!(?request, "starting run");

        let report = match pipeline.run(&request).await {
            Ok(report) => report,
            Err(TilesError::Preflight(outcome)) => {
                print_preflight_warning(outcome);
                std::process::exit(1);
            }
            Err(e) => return Err(e.into()),
        };

        for artifact in &report.artifacts {
            let name = &report.names[artifact.index];
            print_success(&format!("{} -> {}", name, artifact.path.display()));
        }
        output_result(&report, cli)
    }
}
