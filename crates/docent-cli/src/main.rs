//! Docent CLI - AI document enrichment for Paperless-ngx.

use clap::Parser;
use docent_analyzer::AuditLog;
use docent_cli::commands;
use docent_cli::{Cli, Command, Settings};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::from_env()?;

    let audit = if cli.no_audit {
        None
    } else {
        Some(AuditLog::new(&cli.log_dir))
    };

    match cli.command {
        Command::Process(args) => commands::execute_process(args, &settings, audit).await?,
        Command::Analyze(args) => commands::execute_analyze(args, &settings, audit).await?,
        Command::Status => commands::execute_status(&settings).await?,
    }

    Ok(())
}
