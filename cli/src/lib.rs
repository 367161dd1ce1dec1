//! CLI utilities for smarttile.
//!
//! Config contexts, app paths, run files and output helpers shared by
//! the command-line front ends.

pub mod config;
pub mod output;
pub mod paths;
pub mod run_file;

pub use config::{load_config, save_config, Config, Context};
pub use output::{print_verbose, Output, OutputFormat};
pub use paths::{Paths, DEFAULT_OUTPUT_DIR};
pub use run_file::{RunFile, RunFileError, STDIN_SOURCE};
