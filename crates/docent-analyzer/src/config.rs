//! Configuration for the analyzer

use docent_domain::CustomField;
use docent_prompt::{RestrictionFlags, DEFAULT_MUST_HAVE_TEMPLATE, ENRICHMENT_TOKEN_CAP};
use docent_tokens::resolve;
use serde::{Deserialize, Serialize};

/// Response-token reservation cap applied to profile-derived defaults
const RESPONSE_TOKEN_CAP: usize = 4_096;

/// Configuration for the document analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Target model identifier
    pub model: String,

    /// Base system prompt
    pub system_prompt: String,

    /// Must-have output-shape template (with the custom-fields slot)
    pub must_have_template: String,

    /// Custom field definitions substituted into the template
    pub custom_fields: Vec<CustomField>,

    /// Overall token limit (defaults to the model's context window)
    pub token_limit: usize,

    /// Tokens reserved for the response
    pub response_tokens: usize,

    /// Cap on sanitized enrichment data
    pub enrichment_token_cap: usize,

    /// Prepend existing taxonomy data to the prompt
    pub use_existing_data: bool,

    /// Restrict tags to the existing tag list
    pub restrict_to_existing_tags: bool,

    /// Restrict the correspondent to the existing list
    pub restrict_to_existing_correspondents: bool,

    /// Restrict the document type to the existing list
    pub restrict_to_existing_document_types: bool,

    /// Match documents against a fixed predefined tag list
    pub use_predefined_tags: bool,

    /// The predefined tag list
    pub predefined_tags: Vec<String>,

    /// Refusal markers for the response classifier
    pub refusal_markers: Vec<String>,
}

impl AnalyzerConfig {
    /// Configuration with limits derived from the model's capability
    /// profile: token limit from the context window, response reservation
    /// capped at 4096
    pub fn for_model(model: impl Into<String>) -> Self {
        let model = model.into();
        let profile = resolve(&model);

        Self {
            model,
            system_prompt: String::new(),
            must_have_template: DEFAULT_MUST_HAVE_TEMPLATE.to_string(),
            custom_fields: Vec::new(),
            token_limit: profile.context_window,
            response_tokens: profile.max_output_tokens.min(RESPONSE_TOKEN_CAP),
            enrichment_token_cap: ENRICHMENT_TOKEN_CAP,
            use_existing_data: false,
            restrict_to_existing_tags: false,
            restrict_to_existing_correspondents: false,
            restrict_to_existing_document_types: false,
            use_predefined_tags: false,
            predefined_tags: Vec::new(),
            refusal_markers: Vec::new(),
        }
    }

    /// The restriction flags as a single value
    pub fn restrictions(&self) -> RestrictionFlags {
        RestrictionFlags {
            tags: self.restrict_to_existing_tags,
            correspondents: self.restrict_to_existing_correspondents,
            document_types: self.restrict_to_existing_document_types,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.response_tokens == 0 {
            return Err("response_tokens must be greater than 0".to_string());
        }
        if self.token_limit <= self.response_tokens {
            return Err("token_limit must exceed response_tokens".to_string());
        }
        if self.enrichment_token_cap == 0 {
            return Err("enrichment_token_cap must be greater than 0".to_string());
        }
        if self.use_predefined_tags && self.predefined_tags.is_empty() {
            return Err("predefined-tag mode requires a non-empty tag list".to_string());
        }
        Ok(())
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for AnalyzerConfig {
    /// Defaults sized for the smallest current-generation model
    fn default() -> Self {
        Self::for_model("gpt-5-nano")
    }
}
