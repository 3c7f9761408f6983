//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};

/// Docent - AI document enrichment for Paperless-ngx.
#[derive(Debug, Parser)]
#[command(name = "docent")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory for prompt/response audit logs
    #[arg(long, global = true, default_value = "./logs")]
    pub log_dir: String,

    /// Disable audit logging
    #[arg(long, global = true)]
    pub no_audit: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Process all unprocessed documents
    Process(ProcessArgs),

    /// Analyze a single document and print the result
    Analyze(AnalyzeArgs),

    /// Check provider and document-store connectivity
    Status,
}

/// Arguments for the process command.
#[derive(Debug, Parser)]
pub struct ProcessArgs {
    /// Analyze without writing metadata back
    #[arg(long)]
    pub dry_run: bool,

    /// Process at most this many documents
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Document identifier
    pub id: u64,

    /// Replace the configured system prompt for this request
    #[arg(short, long)]
    pub prompt: Option<String>,
}
