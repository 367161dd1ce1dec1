//! Preflight-only run.

use clap::Args;
use serde::Serialize;

use smarttile_tiles::GenerationRequest;

use super::{
    create_pipeline, output_result, print_preflight_warning, print_success, resolve_settings,
    RunArgs,
};
use crate::Cli;

/// Check folder, web UI and API key without generating anything.
///
/// The checks run in the same order as before a generation and stop at the
/// first failure. The key check spends one completion of the prompt "test",
/// sent with the same temperature and max_tokens as the name requests.
#[derive(Args)]
pub struct CheckCommand {
    #[command(flatten)]
    args: RunArgs,
}

#[derive(Serialize)]
struct CheckResult {
    outcome: &'static str,
    message: &'static str,
    output_dir: String,
    sd_url: String,
}

impl CheckCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let settings = resolve_settings(cli, &self.args)?;
        let credential = settings.credential()?;
        let output_dir = settings.output_dir()?;

        let pipeline = create_pipeline(&settings, credential.value())?;
        let theme = settings.theme.as_deref().unwrap_or_default();
        let request = GenerationRequest::new(theme, credential.value(), &output_dir);

        let outcome = pipeline.preflight(&request).await;
        let result = CheckResult {
            outcome: outcome.code(),
            message: outcome.message(),
            output_dir: output_dir.display().to_string(),
            sd_url: settings.pipeline.sd_url.clone(),
        };

        if !outcome.is_ok() {
            print_preflight_warning(outcome);
            output_result(&result, cli)?;
            std::process::exit(1);
        }

        print_success("All checks passed");
        output_result(&result, cli)
    }
}
