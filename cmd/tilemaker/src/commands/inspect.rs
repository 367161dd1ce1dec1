//! Embedded metadata viewer.

use clap::Args;
use serde::Serialize;

use smarttile_tiles::{read_text_chunk, PARAMETERS_KEY};

use super::output_result;
use crate::Cli;

/// Print the generation parameters embedded in a texture.
#[derive(Args)]
pub struct InspectCommand {
    /// PNG file written by `tilemaker generate`
    path: String,
}

#[derive(Serialize)]
struct InspectResult<'a> {
    path: &'a str,
    parameters: String,
}

impl InspectCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let data = tokio::fs::read(&self.path).await?;
        let parameters = read_text_chunk(&data, PARAMETERS_KEY)?
            .ok_or_else(|| anyhow::anyhow!("{} has no {} chunk", self.path, PARAMETERS_KEY))?;

        if cli.json || cli.output.is_some() {
            return output_result(
                &InspectResult {
                    path: &self.path,
                    parameters,
                },
                cli,
            );
        }

        println!("{}", parameters);
        Ok(())
    }
}
