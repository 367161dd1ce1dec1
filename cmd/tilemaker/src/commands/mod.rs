//! CLI commands module.

mod check;
mod config;
mod generate;
mod inspect;
mod names;
mod util;

pub use check::CheckCommand;
pub use config::ConfigCommand;
pub use generate::GenerateCommand;
pub use inspect::InspectCommand;
pub use names::NamesCommand;

pub(crate) use util::*;
