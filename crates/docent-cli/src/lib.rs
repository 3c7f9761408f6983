//! Docent CLI library.
//!
//! Command-line interface for the Docent document-enrichment pipeline:
//! environment-driven settings, provider/transport bootstrap, and the
//! process/analyze/status commands.

pub mod cli;
pub mod commands;
pub mod error;
pub mod settings;

pub use cli::{Cli, Command};
pub use error::{CliError, Result};
pub use settings::Settings;
