//! Smart Tile Maker - themed seamless textures from the command line.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{CheckCommand, ConfigCommand, GenerateCommand, InspectCommand, NamesCommand};

/// Smart Tile Maker - generate themed, tileable textures.
///
/// Asks a text-completion model for materials that fit a theme, renders a
/// seamless texture for each on a local Stable Diffusion web UI, and saves
/// them as Texture0.png .. Texture4.png.
///
/// The API key is read from OPENAI_API_KEY first, then --api-key, then the
/// active context. Configuration is stored in ~/.smarttile/tilemaker/ and
/// supports multiple contexts, similar to kubectl's context management.
#[derive(Parser)]
#[command(name = "tilemaker")]
#[command(about = "Themed seamless texture generator")]
#[command(version)]
pub struct Cli {
    /// Config file (default is ~/.smarttile/tilemaker/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Context name to use
    #[arg(short = 'c', long, global = true)]
    pub context: Option<String>,

    /// Output file for reports (default: stdout)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,

    /// Run file with theme and output_dir (YAML or JSON, `-` for stdin)
    #[arg(short = 'f', long = "file", global = true)]
    pub input: Option<String>,

    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage CLI configuration
    Config(ConfigCommand),
    /// Generate textures for a theme
    Generate(GenerateCommand),
    /// Check folder, image service and API key without generating
    Check(CheckCommand),
    /// Generate material names only
    Names(NamesCommand),
    /// Print the generation parameters embedded in a texture
    Inspect(InspectCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Config(cmd) => cmd.run(&cli).await,
        Commands::Generate(cmd) => cmd.run(&cli).await,
        Commands::Check(cmd) => cmd.run(&cli).await,
        Commands::Names(cmd) => cmd.run(&cli).await,
        Commands::Inspect(cmd) => cmd.run(&cli).await,
    }
}
