//! Single-document analysis

use crate::cli::AnalyzeArgs;
use crate::error::Result;
use crate::settings::Settings;
use colored::Colorize;
use docent_analyzer::{AnalysisRequest, AuditLog, DocumentAnalyzer};
use docent_domain::traits::DocumentStore;
use docent_enrich::EnrichmentFetcher;

/// Analyze one document and print the result without writing back
pub async fn execute_analyze(
    args: AnalyzeArgs,
    settings: &Settings,
    audit: Option<AuditLog>,
) -> Result<()> {
    let store = settings.paperless_client()?;
    let transport = settings.transport()?;

    let mut analyzer = DocumentAnalyzer::new(transport, settings.analyzer_config());
    if let Some(audit) = audit {
        analyzer = analyzer.with_audit_log(audit);
    }

    let document = store.fetch_document(args.id).await?;
    let tags = store.list_tags().await?;
    let correspondents = store.list_correspondents().await?;
    let document_types = store.list_document_types().await?;
    let enrichment = EnrichmentFetcher::new(settings.enrichment.clone())
        .fetch()
        .await;

    let mut request = AnalysisRequest::new(document.id, document.content)
        .with_taxonomy(tags, correspondents, document_types)
        .with_enrichment(enrichment);
    if let Some(prompt) = args.prompt {
        request = request.with_override_prompt(prompt);
    }

    let result = analyzer.analyze(request).await;

    if let Some(error) = &result.error {
        println!("{} {error}", "Error:".red().bold());
    }
    println!("{}", "Analysis result:".bold());
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
