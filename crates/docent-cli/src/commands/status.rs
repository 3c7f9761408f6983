//! Connectivity checks

use crate::error::Result;
use crate::settings::Settings;
use colored::Colorize;
use docent_domain::traits::{DocumentStore, LlmTransport};

/// Probe the provider and the document store
pub async fn execute_status(settings: &Settings) -> Result<()> {
    let transport = settings.transport()?;
    match transport.check_status().await {
        Ok(()) => println!(
            "{} provider reachable (model: {})",
            "ok".green().bold(),
            settings.model
        ),
        Err(err) => println!("{} provider: {err}", "error".red().bold()),
    }

    match settings.paperless_client() {
        Ok(store) => match store.list_tags().await {
            Ok(tags) => println!(
                "{} document store reachable ({} tags)",
                "ok".green().bold(),
                tags.len()
            ),
            Err(err) => println!("{} document store: {err}", "error".red().bold()),
        },
        Err(err) => println!("{} document store: {err}", "error".red().bold()),
    }

    Ok(())
}
