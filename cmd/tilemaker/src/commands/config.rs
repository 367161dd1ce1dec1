//! Configuration management commands.

use clap::{Args, Subcommand};

use smarttile_cli::Context as CliContext;
use smarttile_tiles::mask_credential;

use super::{get_config, print_success};
use crate::Cli;

/// Manage CLI configuration.
///
/// Contexts allow you to keep several API keys, web UI addresses and output
/// folders side by side, similar to kubectl's context management.
///
/// Configuration is stored in ~/.smarttile/tilemaker/config.yaml
#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    /// Add a new context (replaces one with the same name)
    #[command(name = "add-context")]
    AddContext {
        /// Context name
        name: String,
        /// Completion API key
        #[arg(long)]
        api_key: Option<String>,
        /// Completion API base URL
        #[arg(long)]
        base_url: Option<String>,
        /// Stable Diffusion web UI address
        #[arg(long)]
        sd_url: Option<String>,
        /// Folder textures are written to
        #[arg(long)]
        output_dir: Option<String>,
        /// Checkpoint selected before each texture
        #[arg(long)]
        checkpoint: Option<String>,
        /// Completion model
        #[arg(long)]
        model: Option<String>,
        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Delete a context
    #[command(name = "delete-context")]
    DeleteContext {
        /// Context name
        name: String,
    },
    /// Set the current context
    #[command(name = "use-context")]
    UseContext {
        /// Context name
        name: String,
    },
    /// Display the current context
    #[command(name = "get-context")]
    GetContext,
    /// List all contexts
    #[command(name = "list-contexts", alias = "get-contexts")]
    ListContexts,
    /// View the current configuration
    View,
}

impl ConfigCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            ConfigSubcommand::AddContext {
                name,
                api_key,
                base_url,
                sd_url,
                output_dir,
                checkpoint,
                model,
                timeout,
            } => {
                let mut cfg = get_config(cli)?;

                let ctx = CliContext {
                    api_key: api_key.clone().unwrap_or_default(),
                    base_url: base_url.clone().unwrap_or_default(),
                    sd_url: sd_url.clone().unwrap_or_default(),
                    output_dir: output_dir.clone().unwrap_or_default(),
                    checkpoint: checkpoint.clone().unwrap_or_default(),
                    model: model.clone().unwrap_or_default(),
                    timeout: timeout.unwrap_or(0),
                    ..Default::default()
                };

                let first = cfg.contexts.is_empty();
                cfg.add_context(name, ctx)?;
                print_success(&format!("Context \"{}\" added successfully", name));

                if first {
                    cfg.use_context(name)?;
                    print_success(&format!("Switched to context \"{}\"", name));
                }
                Ok(())
            }

            ConfigSubcommand::DeleteContext { name } => {
                let mut cfg = get_config(cli)?;
                cfg.delete_context(name)?;
                print_success(&format!("Context \"{}\" deleted", name));
                Ok(())
            }

            ConfigSubcommand::UseContext { name } => {
                let mut cfg = get_config(cli)?;
                cfg.use_context(name)?;
                print_success(&format!("Switched to context \"{}\"", name));
                Ok(())
            }

            ConfigSubcommand::GetContext => {
                let cfg = get_config(cli)?;
                if cfg.current_context.is_empty() {
                    println!("No current context set");
                } else {
                    println!("{}", cfg.current_context);
                }
                Ok(())
            }

            ConfigSubcommand::ListContexts => {
                let cfg = get_config(cli)?;

                if cfg.contexts.is_empty() {
                    println!("No contexts configured");
                    return Ok(());
                }

                println!("{:<8} {:<20} {:<30} {}", "CURRENT", "NAME", "SD_URL", "OUTPUT_DIR");

                for name in cfg.list_contexts() {
                    let Some(ctx) = cfg.get_context(name) else {
                        continue;
                    };
                    let current = if name == cfg.current_context { "*" } else { "" };
                    println!(
                        "{:<8} {:<20} {:<30} {}",
                        current,
                        name,
                        or_default(&ctx.sd_url),
                        or_default(&ctx.output_dir)
                    );
                }

                Ok(())
            }

            ConfigSubcommand::View => {
                let cfg = get_config(cli)?;

                println!("Config file: {}", cfg.path().display());
                println!("Current context: {}", cfg.current_context);
                println!("Contexts: {}", cfg.contexts.len());

                if !cfg.contexts.is_empty() {
                    println!("\nContext details:");

                    for name in cfg.list_contexts() {
                        let Some(ctx) = cfg.get_context(name) else {
                            continue;
                        };
                        println!("\n  {}:", name);
                        if !ctx.api_key.is_empty() {
                            println!("    API Key: {}", mask_credential(&ctx.api_key));
                        }
                        let fields = [
                            ("Base URL", &ctx.base_url),
                            ("SD URL", &ctx.sd_url),
                            ("Output Dir", &ctx.output_dir),
                            ("Checkpoint", &ctx.checkpoint),
                            ("Model", &ctx.model),
                        ];
                        for (label, value) in fields {
                            if !value.is_empty() {
                                println!("    {}: {}", label, value);
                            }
                        }
                        if ctx.timeout > 0 {
                            println!("    Timeout: {}s", ctx.timeout);
                        }
                    }
                }

                Ok(())
            }
        }
    }
}

fn or_default(value: &str) -> &str {
    if value.is_empty() { "(default)" } else { value }
}
