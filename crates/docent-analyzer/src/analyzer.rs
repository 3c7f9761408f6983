//! Core DocumentAnalyzer implementation

use crate::audit::AuditLog;
use crate::classify::{RefusalClassifier, INSUFFICIENT_CONTENT_ERROR};
use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::extract::{extract_document, Extraction};
use chrono::Utc;
use docent_domain::traits::LlmTransport;
use docent_domain::{
    document_analysis_schema, AnalysisResult, CompletionRequest, DocumentId, DocumentMetadata,
    ProviderReply,
};
use docent_prompt::{sanitize_for_prompt, PromptAssembler, PromptBundle};
use docent_tokens::supports_temperature;
use serde_json::Value;
use tracing::{debug, error, info, warn};

/// Sampling temperature for analysis requests
const ANALYSIS_TEMPERATURE: f32 = 0.3;

/// One document-analysis request.
///
/// Taxonomy lists come from the document store; the override prompt (if
/// any) from a webhook or per-request caller; enrichment from the
/// external-API fetcher.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Document identifier (used for degraded-result titles)
    pub document_id: DocumentId,

    /// Full extracted document text
    pub content: String,

    /// Existing tag names
    pub existing_tags: Vec<String>,

    /// Existing correspondent names
    pub existing_correspondents: Vec<String>,

    /// Existing document type names
    pub existing_document_types: Vec<String>,

    /// Caller-supplied prompt replacing the configured system prompt
    pub override_prompt: Option<String>,

    /// Raw enrichment payload (sanitized before it reaches the prompt)
    pub enrichment: Option<Value>,
}

impl AnalysisRequest {
    /// A request with just id and content; taxonomy and extras empty
    pub fn new(document_id: DocumentId, content: impl Into<String>) -> Self {
        Self {
            document_id,
            content: content.into(),
            existing_tags: Vec::new(),
            existing_correspondents: Vec::new(),
            existing_document_types: Vec::new(),
            override_prompt: None,
            enrichment: None,
        }
    }

    /// Attach the existing taxonomy lists
    pub fn with_taxonomy(
        mut self,
        tags: Vec<String>,
        correspondents: Vec<String>,
        document_types: Vec<String>,
    ) -> Self {
        self.existing_tags = tags;
        self.existing_correspondents = correspondents;
        self.existing_document_types = document_types;
        self
    }

    /// Attach a caller-supplied override prompt
    pub fn with_override_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.override_prompt = Some(prompt.into());
        self
    }

    /// Attach a raw enrichment payload
    pub fn with_enrichment(mut self, enrichment: Option<Value>) -> Self {
        self.enrichment = enrichment;
        self
    }
}

/// The analyzer drives one document through prompt assembly, provider
/// dispatch, and response extraction.
///
/// Stateless across calls aside from read-only configuration; concurrent
/// analyses only require shared references.
pub struct DocumentAnalyzer<T: LlmTransport> {
    transport: T,
    config: AnalyzerConfig,
    classifier: RefusalClassifier,
    audit: Option<AuditLog>,
}

impl<T: LlmTransport> DocumentAnalyzer<T> {
    /// Create an analyzer over the given transport and configuration.
    ///
    /// The refusal classifier uses the configured markers, or the default
    /// set when none are configured.
    pub fn new(transport: T, config: AnalyzerConfig) -> Self {
        let classifier = if config.refusal_markers.is_empty() {
            RefusalClassifier::default()
        } else {
            RefusalClassifier::new(config.refusal_markers.clone())
        };

        Self {
            transport,
            config,
            classifier,
            audit: None,
        }
    }

    /// Enable prompt/response audit logging
    pub fn with_audit_log(mut self, audit: AuditLog) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Analyze one document.
    ///
    /// Never propagates expected failures: the result always carries a
    /// document object, degrading to a placeholder with an `error` marker
    /// when anything goes wrong.
    pub async fn analyze(&self, request: AnalysisRequest) -> AnalysisResult {
        let document_id = request.document_id;
        match self.try_analyze(request).await {
            Ok(result) => result,
            Err(err) => {
                error!(document_id, %err, "failed to analyze document");
                AnalysisResult::failed(err.to_string())
            }
        }
    }

    async fn try_analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult, AnalyzerError> {
        self.config.validate().map_err(AnalyzerError::Config)?;

        let enrichment = sanitize_for_prompt(
            request.enrichment.as_ref(),
            self.config.enrichment_token_cap,
            &self.config.model,
        );
        if enrichment.is_some() {
            debug!("external enrichment data validated and included");
        }

        let bundle = self.assemble_prompt(&request, enrichment)?;
        info!(
            document_id = request.document_id,
            prompt_tokens = bundle.prompt_tokens,
            available_tokens = bundle.available_tokens,
            truncated = bundle.truncated,
            "prompt assembled"
        );

        if let Some(audit) = &self.audit {
            audit.record_prompt(&bundle.instructions, &bundle.content);
        }

        let completion = CompletionRequest {
            model: self.config.model.clone(),
            instructions: bundle.instructions.clone(),
            input: bundle.content.clone(),
            temperature: supports_temperature(&self.config.model).then_some(ANALYSIS_TEMPERATURE),
            max_output_tokens: Some(self.config.response_tokens),
            schema: Some(document_analysis_schema(&self.config.custom_fields)),
        };

        let response = self.transport.complete(completion).await?;

        if let Some(audit) = &self.audit {
            match &response.reply {
                ProviderReply::StructuredOutput(value) => {
                    audit.record_response(&serde_json::to_string_pretty(value).unwrap_or_default())
                }
                ProviderReply::RawText(text) => audit.record_response(text),
            }
        }

        match extract_document(&response.reply, &self.classifier)? {
            Extraction::Valid(document) => {
                Ok(AnalysisResult::ok(document, response.usage, bundle.truncated))
            }
            Extraction::Insufficient => {
                warn!(
                    document_id = request.document_id,
                    "document has insufficient content for analysis"
                );
                Ok(AnalysisResult::degraded(
                    insufficient_placeholder(request.document_id),
                    response.usage,
                    INSUFFICIENT_CONTENT_ERROR,
                ))
            }
        }
    }

    fn assemble_prompt(
        &self,
        request: &AnalysisRequest,
        enrichment: Option<String>,
    ) -> Result<PromptBundle, AnalyzerError> {
        let mut assembler = PromptAssembler::new(
            self.config.system_prompt.clone(),
            self.config.model.clone(),
        )
            .with_must_have_template(self.config.must_have_template.clone())
            .with_custom_fields(self.config.custom_fields.clone())
            .with_taxonomy(
                request.existing_tags.clone(),
                request.existing_correspondents.clone(),
                request.existing_document_types.clone(),
            )
            .with_existing_data(self.config.use_existing_data)
            .with_restrictions(self.config.restrictions())
            .with_enrichment(enrichment)
            .with_token_limit(self.config.token_limit)
            .with_response_tokens(self.config.response_tokens);

        if self.config.use_predefined_tags {
            assembler = assembler.with_predefined_tags(self.config.predefined_tags.clone());
        }
        if let Some(prompt) = &request.override_prompt {
            debug!("replacing system prompt with caller-supplied override");
            assembler = assembler.with_override_prompt(prompt.clone());
        }

        Ok(assembler.assemble(&request.content)?)
    }
}

/// The placeholder document emitted for a provider refusal
fn insufficient_placeholder(id: DocumentId) -> DocumentMetadata {
    DocumentMetadata {
        title: Some(format!("Document {id}")),
        correspondent: Some("Unknown".to_string()),
        tags: Vec::new(),
        document_type: Some("Document".to_string()),
        document_date: Some(Utc::now().format("%Y-%m-%d").to_string()),
        language: Some("und".to_string()),
        custom_fields: None,
    }
}
