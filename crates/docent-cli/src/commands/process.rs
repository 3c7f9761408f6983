//! Batch processing of unprocessed documents

use crate::cli::ProcessArgs;
use crate::error::Result;
use crate::settings::Settings;
use colored::Colorize;
use docent_analyzer::{
    AnalysisRequest, AuditLog, DocumentAnalyzer, RetryTracker, INSUFFICIENT_CONTENT_ERROR,
};
use docent_domain::traits::{DocumentStore, LlmTransport};
use docent_domain::DocumentContent;
use docent_enrich::EnrichmentFetcher;
use tracing::{info, warn};

/// Run the batch processing loop.
///
/// Hard-failed documents are re-attempted within the run until the retry
/// tracker exhausts them; degraded (insufficient content) results are
/// terminal and are marked processed so the next run does not pick them
/// up again.
pub async fn execute_process(
    args: ProcessArgs,
    settings: &Settings,
    audit: Option<AuditLog>,
) -> Result<()> {
    let store = settings.paperless_client()?;
    let transport = settings.transport()?;

    let mut analyzer = DocumentAnalyzer::new(transport, settings.analyzer_config());
    if let Some(audit) = audit {
        analyzer = analyzer.with_audit_log(audit);
    }
    let fetcher = EnrichmentFetcher::new(settings.enrichment.clone());

    let tags = store.list_tags().await?;
    let correspondents = store.list_correspondents().await?;
    let document_types = store.list_document_types().await?;

    let mut pending = store.list_unprocessed(&settings.processed_tag_name).await?;
    if let Some(limit) = args.limit {
        pending.truncate(limit);
    }
    info!(count = pending.len(), "found unprocessed documents");

    let mut tracker = RetryTracker::default();
    let mut succeeded = 0usize;
    let mut degraded = 0usize;
    let mut failed = 0usize;

    while !pending.is_empty() {
        let mut requeued: Vec<DocumentContent> = Vec::new();

        for document in pending {
            let outcome = process_one(
                &analyzer,
                &store,
                &fetcher,
                settings,
                &document,
                (
                    tags.as_slice(),
                    correspondents.as_slice(),
                    document_types.as_slice(),
                ),
                args.dry_run,
            )
            .await;

            match outcome {
                Outcome::Succeeded => {
                    tracker.record_success(document.id);
                    succeeded += 1;
                }
                Outcome::Degraded => degraded += 1,
                Outcome::Failed => {
                    tracker.record_failure(document.id);
                    if tracker.should_attempt(document.id) {
                        requeued.push(document);
                    } else {
                        warn!(document_id = document.id, "retry attempts exhausted");
                        failed += 1;
                    }
                }
            }
        }

        pending = requeued;
    }

    println!(
        "{} {} succeeded, {} degraded, {} failed",
        "Processing complete:".bold(),
        succeeded.to_string().green(),
        degraded.to_string().yellow(),
        failed.to_string().red(),
    );

    Ok(())
}

enum Outcome {
    Succeeded,
    Degraded,
    Failed,
}

async fn process_one<T: LlmTransport>(
    analyzer: &DocumentAnalyzer<T>,
    store: &impl DocumentStore,
    fetcher: &EnrichmentFetcher,
    settings: &Settings,
    document: &DocumentContent,
    taxonomy: (&[String], &[String], &[String]),
    dry_run: bool,
) -> Outcome {
    let (tags, correspondents, document_types) = taxonomy;

    let request = AnalysisRequest::new(document.id, document.content.clone())
        .with_taxonomy(
            tags.to_vec(),
            correspondents.to_vec(),
            document_types.to_vec(),
        )
        .with_enrichment(fetcher.fetch().await);

    let result = analyzer.analyze(request).await;

    match result.error.as_deref() {
        None => {
            info!(
                document_id = document.id,
                title = ?result.document.title,
                "document analyzed"
            );
            if !dry_run {
                if let Err(err) = store.update_metadata(document.id, &result.document).await {
                    warn!(document_id = document.id, %err, "failed to persist metadata");
                    return Outcome::Failed;
                }
                if settings.add_processed_tag {
                    if let Err(err) = store
                        .append_tag(document.id, &settings.processed_tag_name)
                        .await
                    {
                        warn!(document_id = document.id, %err, "failed to append processed tag");
                    }
                }
            }
            Outcome::Succeeded
        }
        Some(INSUFFICIENT_CONTENT_ERROR) => {
            // Terminal: the provider refused; re-analysis would refuse again
            warn!(
                document_id = document.id,
                "insufficient content, marking for manual review"
            );
            if !dry_run && settings.add_processed_tag {
                if let Err(err) = store
                    .append_tag(document.id, &settings.processed_tag_name)
                    .await
                {
                    warn!(document_id = document.id, %err, "failed to append processed tag");
                }
            }
            Outcome::Degraded
        }
        Some(error) => {
            warn!(document_id = document.id, error, "analysis failed");
            Outcome::Failed
        }
    }
}
