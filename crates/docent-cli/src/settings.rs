//! Environment-driven settings
//!
//! All runtime configuration comes from environment variables, matching
//! the deployment style of the document-management ecosystem (a single
//! env file per container). The system prompt may instead live in a
//! `system-prompt.md` file next to the process, which wins over the
//! environment variable when present.

use crate::error::{CliError, Result};
use docent_analyzer::AnalyzerConfig;
use docent_domain::CustomFieldList;
use docent_enrich::EnrichmentConfig;
use docent_llm::{HttpTransport, ProviderEndpoint, ProviderKind, OLLAMA_DEFAULT_URL};
use docent_paperless::PaperlessClient;
use std::env;
use std::fs;
use tracing::{info, warn};

/// File consulted for the system prompt before the environment variable
const SYSTEM_PROMPT_FILE: &str = "system-prompt.md";

/// Default model when the provider does not name one
const DEFAULT_OPENAI_MODEL: &str = "gpt-5-nano";

/// Default Ollama model
const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";

/// Default name of the processed-marker tag
const DEFAULT_PROCESSED_TAG: &str = "ai-processed";

/// Resolved runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// Which provider to dispatch analysis requests to
    pub provider: ProviderKind,

    /// Model identifier (or Azure deployment name)
    pub model: String,

    /// OpenAI API key
    pub openai_api_key: String,

    /// Ollama base URL
    pub ollama_api_url: String,

    /// Custom endpoint base URL
    pub custom_base_url: String,

    /// Custom endpoint API key
    pub custom_api_key: String,

    /// Azure endpoint
    pub azure_endpoint: String,

    /// Azure deployment name
    pub azure_deployment: String,

    /// Azure API key
    pub azure_api_key: String,

    /// Azure API version
    pub azure_api_version: String,

    /// Document-management API base URL
    pub paperless_api_url: String,

    /// Document-management API token
    pub paperless_api_token: String,

    /// Overall token limit override
    pub token_limit: Option<usize>,

    /// Response-token reservation override
    pub response_tokens: Option<usize>,

    /// Base system prompt
    pub system_prompt: String,

    /// Custom field definitions
    pub custom_fields: CustomFieldList,

    /// Prepend existing taxonomy data to prompts
    pub use_existing_data: bool,

    /// Restrict tags to the existing list
    pub restrict_to_existing_tags: bool,

    /// Restrict correspondents to the existing list
    pub restrict_to_existing_correspondents: bool,

    /// Restrict document types to the existing list
    pub restrict_to_existing_document_types: bool,

    /// Match documents against a predefined tag list
    pub use_predefined_tags: bool,

    /// The predefined tag list
    pub predefined_tags: Vec<String>,

    /// Tag successfully processed documents
    pub add_processed_tag: bool,

    /// Name of the processed-marker tag
    pub processed_tag_name: String,

    /// External enrichment configuration
    pub enrichment: EnrichmentConfig,
}

impl Settings {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load settings from an arbitrary variable lookup (testable)
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let provider = parse_provider(get("AI_PROVIDER").as_deref().unwrap_or("openai"))?;

        let model = match provider {
            ProviderKind::OpenAi => {
                get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string())
            }
            ProviderKind::Ollama => {
                get("OLLAMA_MODEL").unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string())
            }
            ProviderKind::Custom => get("CUSTOM_MODEL").unwrap_or_default(),
            ProviderKind::Azure => get("AZURE_DEPLOYMENT_NAME").unwrap_or_default(),
        };

        let system_prompt = load_system_prompt(&get);

        let custom_fields = get("CUSTOM_FIELDS")
            .map(|raw| CustomFieldList::parse_lenient(&raw))
            .unwrap_or_default();

        let enrichment = EnrichmentConfig {
            enabled: parse_flag(get("EXTERNAL_API_ENABLED").as_deref(), false),
            url: get("EXTERNAL_API_URL").unwrap_or_default(),
            method: get("EXTERNAL_API_METHOD").unwrap_or_else(|| "GET".to_string()),
            headers: get("EXTERNAL_API_HEADERS").unwrap_or_else(|| "{}".to_string()),
            body: get("EXTERNAL_API_BODY").unwrap_or_else(|| "{}".to_string()),
            timeout_secs: get("EXTERNAL_API_TIMEOUT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(EnrichmentConfig::default().timeout_secs),
            transform: get("EXTERNAL_API_TRANSFORM").filter(|t| !t.is_empty()),
            allow_private_ips: parse_flag(get("EXTERNAL_API_ALLOW_PRIVATE_IPS").as_deref(), false),
        };

        Ok(Self {
            provider,
            model,
            openai_api_key: get("OPENAI_API_KEY").unwrap_or_default(),
            ollama_api_url: get("OLLAMA_API_URL")
                .unwrap_or_else(|| OLLAMA_DEFAULT_URL.to_string()),
            custom_base_url: get("CUSTOM_BASE_URL").unwrap_or_default(),
            custom_api_key: get("CUSTOM_API_KEY").unwrap_or_default(),
            azure_endpoint: get("AZURE_ENDPOINT").unwrap_or_default(),
            azure_deployment: get("AZURE_DEPLOYMENT_NAME").unwrap_or_default(),
            azure_api_key: get("AZURE_API_KEY").unwrap_or_default(),
            azure_api_version: get("AZURE_API_VERSION")
                .unwrap_or_else(|| "2023-05-15".to_string()),
            paperless_api_url: get("PAPERLESS_API_URL").unwrap_or_default(),
            paperless_api_token: get("PAPERLESS_API_TOKEN").unwrap_or_default(),
            token_limit: get("TOKEN_LIMIT").and_then(|v| v.parse().ok()),
            response_tokens: get("RESPONSE_TOKENS").and_then(|v| v.parse().ok()),
            system_prompt,
            custom_fields,
            use_existing_data: parse_flag(get("USE_EXISTING_DATA").as_deref(), false),
            restrict_to_existing_tags: parse_flag(
                get("RESTRICT_TO_EXISTING_TAGS").as_deref(),
                false,
            ),
            restrict_to_existing_correspondents: parse_flag(
                get("RESTRICT_TO_EXISTING_CORRESPONDENTS").as_deref(),
                false,
            ),
            restrict_to_existing_document_types: parse_flag(
                get("RESTRICT_TO_EXISTING_DOCUMENT_TYPES").as_deref(),
                false,
            ),
            use_predefined_tags: parse_flag(get("USE_PROMPT_TAGS").as_deref(), false),
            predefined_tags: get("PROMPT_TAGS")
                .map(|raw| {
                    raw.split(',')
                        .map(|t| t.trim().to_string())
                        .filter(|t| !t.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            add_processed_tag: parse_flag(get("ADD_AI_PROCESSED_TAG").as_deref(), false),
            processed_tag_name: get("AI_PROCESSED_TAG_NAME")
                .unwrap_or_else(|| DEFAULT_PROCESSED_TAG.to_string()),
            enrichment,
        })
    }

    /// The analyzer configuration derived from these settings.
    ///
    /// Token limits default to the model's capability profile and may be
    /// overridden by `TOKEN_LIMIT` / `RESPONSE_TOKENS`.
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        let mut config = AnalyzerConfig::for_model(self.model.clone());
        config.system_prompt = self.system_prompt.clone();
        config.custom_fields = self.custom_fields.custom_fields.clone();
        if let Some(limit) = self.token_limit {
            config.token_limit = limit;
        }
        if let Some(tokens) = self.response_tokens {
            config.response_tokens = tokens;
        }
        config.use_existing_data = self.use_existing_data;
        config.restrict_to_existing_tags = self.restrict_to_existing_tags;
        config.restrict_to_existing_correspondents = self.restrict_to_existing_correspondents;
        config.restrict_to_existing_document_types = self.restrict_to_existing_document_types;
        config.use_predefined_tags = self.use_predefined_tags;
        config.predefined_tags = self.predefined_tags.clone();
        config
    }

    /// Build the provider transport for these settings
    pub fn transport(&self) -> Result<HttpTransport> {
        let endpoint = match self.provider {
            ProviderKind::OpenAi => ProviderEndpoint::openai(self.openai_api_key.clone()),
            ProviderKind::Ollama => Ok(ProviderEndpoint::ollama(self.ollama_api_url.clone())),
            ProviderKind::Azure => ProviderEndpoint::azure(
                self.azure_endpoint.clone(),
                self.azure_deployment.clone(),
                self.azure_api_key.clone(),
                self.azure_api_version.clone(),
            ),
            ProviderKind::Custom => {
                ProviderEndpoint::custom(self.custom_base_url.clone(), self.custom_api_key.clone())
            }
        }?;

        Ok(HttpTransport::new(endpoint, self.model.clone()))
    }

    /// Build the document-store client for these settings
    pub fn paperless_client(&self) -> Result<PaperlessClient> {
        if self.paperless_api_url.is_empty() {
            return Err(CliError::Config(
                "PAPERLESS_API_URL is not configured".to_string(),
            ));
        }
        Ok(PaperlessClient::new(
            self.paperless_api_url.clone(),
            self.paperless_api_token.clone(),
        ))
    }
}

/// Parse a yes/no style environment flag ("yes", "true", "1" are true)
pub fn parse_flag(value: Option<&str>, default: bool) -> bool {
    match value {
        None => default,
        Some(v) => {
            let lower = v.to_lowercase();
            lower == "yes" || lower == "true" || lower == "1"
        }
    }
}

fn parse_provider(raw: &str) -> Result<ProviderKind> {
    match raw.to_lowercase().as_str() {
        "openai" => Ok(ProviderKind::OpenAi),
        "ollama" => Ok(ProviderKind::Ollama),
        "azure" => Ok(ProviderKind::Azure),
        "custom" => Ok(ProviderKind::Custom),
        other => Err(CliError::Config(format!("unknown AI provider: {other}"))),
    }
}

/// Load the system prompt from `system-prompt.md`, falling back to the
/// `SYSTEM_PROMPT` environment variable
fn load_system_prompt(get: &impl Fn(&str) -> Option<String>) -> String {
    match fs::read_to_string(SYSTEM_PROMPT_FILE) {
        Ok(content) => {
            info!("loaded system prompt from {SYSTEM_PROMPT_FILE}");
            content.trim().to_string()
        }
        Err(_) => {
            let prompt = get("SYSTEM_PROMPT").unwrap_or_default();
            if prompt.is_empty() {
                warn!("no system prompt found in file or environment");
            }
            prompt
        }
    }
}
