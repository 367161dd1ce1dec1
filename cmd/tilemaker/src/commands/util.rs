//! Utility functions for CLI commands.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use smarttile_cli::{load_config, Config, Context, Output, OutputFormat, Paths, RunFile};
use smarttile_tiles::{
    Credential, Pipeline, PipelineConfig, ValidationOutcome, CREDENTIAL_ENV, HELP_URL,
};

use crate::Cli;

pub const APP_NAME: &str = "tilemaker";

/// Flags shared by the commands that talk to the services.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Theme the materials should fit, e.g. "zombie apocalypse"
    #[arg(short = 't', long)]
    pub theme: Option<String>,

    /// API key (OPENAI_API_KEY takes precedence when set)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Folder the textures are written to (default ~/Smart-Tile-Maker)
    #[arg(long = "out")]
    pub out: Option<String>,

    /// Stable Diffusion web UI address
    #[arg(long)]
    pub sd_url: Option<String>,

    /// Completion model
    #[arg(long)]
    pub model: Option<String>,

    /// Checkpoint selected before each texture
    #[arg(long)]
    pub checkpoint: Option<String>,
}

/// Everything a command needs, merged from flags, run file, context and
/// environment. Flags win over the run file, which wins over the context.
#[derive(Debug)]
pub struct RunSettings {
    pub theme: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub credential: Option<Credential>,
    pub context: Context,
    pub pipeline: PipelineConfig,
}

impl RunSettings {
    /// Returns the theme, or an error when none was given.
    pub fn theme(&self) -> anyhow::Result<&str> {
        self.theme
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("theme is required, use --theme or set it in the run file"))
    }

    /// Returns the credential, or an error naming where one can come from.
    pub fn credential(&self) -> anyhow::Result<&Credential> {
        self.credential.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "no API key: set {}, pass --api-key or add one with 'tilemaker config add-context'",
                CREDENTIAL_ENV
            )
        })
    }

    /// Returns the output folder. Without an explicit one the default
    /// ~/Smart-Tile-Maker is used and created if absent; explicit folders are
    /// left to the preflight check.
    pub fn output_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.output_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Paths::new(APP_NAME)?.ensure_output_dir()?),
        }
    }
}

/// Gets the global configuration.
pub fn get_config(cli: &Cli) -> anyhow::Result<Config> {
    load_config(APP_NAME, cli.config.as_deref())
}

/// Gets the context to use. Without any configured context the built-in
/// defaults apply; naming a missing context is an error.
pub fn get_context(cli: &Cli) -> anyhow::Result<Context> {
    let cfg = get_config(cli)?;

    match cfg.resolve_context(cli.context.as_deref()) {
        Some(ctx) => Ok(ctx.clone()),
        None => match cli.context.as_deref() {
            Some(name) if !name.is_empty() => anyhow::bail!("context '{}' not found", name),
            _ => Ok(Context::default()),
        },
    }
}

/// Resolves the settings for a run.
pub fn resolve_settings(cli: &Cli, args: &RunArgs) -> anyhow::Result<RunSettings> {
    let context = get_context(cli)?;
    let run = RunFile::load_optional(cli.input.as_deref())?;
    let env_key = std::env::var(CREDENTIAL_ENV).ok();
    Ok(merge_settings(args, run, context, env_key))
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() { None } else { Some(s.to_string()) }
}

fn merge_settings(
    args: &RunArgs,
    run: RunFile,
    context: Context,
    env_key: Option<String>,
) -> RunSettings {
    let pick = |flag: &Option<String>, file: Option<String>, ctx: &str| {
        flag.clone().or(file).or_else(|| non_empty(ctx))
    };

    let mut pipeline = PipelineConfig::default();
    if let Some(url) = pick(&args.sd_url, run.sd_url, &context.sd_url) {
        pipeline.sd_url = url;
    }
    if let Some(model) = pick(&args.model, run.model, &context.model) {
        pipeline.completion_model = model;
    }
    if let Some(checkpoint) = pick(&args.checkpoint, run.checkpoint, &context.checkpoint) {
        pipeline.checkpoint = checkpoint;
    }

    let input_key = args.api_key.clone().or_else(|| non_empty(&context.api_key));

    RunSettings {
        theme: args.theme.clone().or(run.theme),
        output_dir: pick(&args.out, run.output_dir, &context.output_dir).map(PathBuf::from),
        credential: Credential::resolve(env_key, input_key),
        context,
        pipeline,
    }
}

/// Creates the completion client from the context and resolved settings.
pub fn create_completer(
    ctx: &Context,
    api_key: &str,
    model: &str,
) -> anyhow::Result<smarttile_openai::Client> {
    let mut builder = smarttile_openai::Client::builder(api_key).model(model);

    if !ctx.base_url.is_empty() {
        builder = builder.base_url(&ctx.base_url);
    }
    if ctx.timeout > 0 {
        builder = builder.timeout(Duration::from_secs(ctx.timeout));
    }

    Ok(builder.build()?)
}

/// Creates the web UI client.
pub fn create_backend(ctx: &Context, sd_url: &str) -> anyhow::Result<smarttile_sdwebui::Client> {
    let mut builder = smarttile_sdwebui::Client::builder().base_url(sd_url);

    if ctx.timeout > 0 {
        builder = builder.timeout(Duration::from_secs(ctx.timeout));
    }

    Ok(builder.build()?)
}

/// Builds a pipeline wired to the real services.
pub fn create_pipeline(settings: &RunSettings, api_key: &str) -> anyhow::Result<Pipeline> {
    let completer = create_completer(
        &settings.context,
        api_key,
        &settings.pipeline.completion_model,
    )?;
    let backend = create_backend(&settings.context, &settings.pipeline.sd_url)?;
    Ok(Pipeline::new(
        settings.pipeline.clone(),
        Arc::new(completer),
        Arc::new(backend),
    ))
}

/// Outputs result as JSON or YAML.
pub fn output_result<T: serde::Serialize>(result: &T, cli: &Cli) -> anyhow::Result<()> {
    Output::new(OutputFormat::from_json_flag(cli.json), cli.output.clone()).write(result)
}

/// Prints verbose output if enabled.
pub fn print_verbose(cli: &Cli, msg: &str) {
    smarttile_cli::print_verbose(cli.verbose, msg);
}

/// Prints success message.
pub fn print_success(msg: &str) {
    eprintln!("\x1b[32m✓\x1b[0m {}", msg);
}

/// Prints warning message.
pub fn print_warning(msg: &str) {
    eprintln!("\x1b[33m⚠\x1b[0m {}", msg);
}

/// Prints the single warning for a failed preflight check.
pub fn print_preflight_warning(outcome: ValidationOutcome) {
    print_warning(&format!("{}\n  Help: {}", outcome.message(), HELP_URL));
}
