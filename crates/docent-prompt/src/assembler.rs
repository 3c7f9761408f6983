//! Prompt assembly and token-budget enforcement

use crate::error::PromptError;
use crate::restriction::{apply_restrictions, RestrictionFlags};
use crate::template::{
    render_must_have_template, render_predefined_tags_template, DEFAULT_MUST_HAVE_TEMPLATE,
    DEFAULT_PREDEFINED_TAGS_TEMPLATE,
};
use docent_domain::CustomField;
use docent_tokens::{count_prompt_tokens, resolve, truncate_to_token_limit};
use tracing::{debug, warn};

/// Response-token reservation cap applied when none is configured
const DEFAULT_RESPONSE_TOKEN_CAP: usize = 4_096;

/// A fully assembled prompt plus the token accounting that justified it
#[derive(Debug, Clone)]
pub struct PromptBundle {
    /// The instruction text for the provider
    pub instructions: String,

    /// Document content, truncated to the available budget
    pub content: String,

    /// Token cost of the instructions (and side-channel segments)
    pub prompt_tokens: usize,

    /// Instructions plus the response reservation
    pub reserved_tokens: usize,

    /// Budget left for document content
    pub available_tokens: usize,

    /// Whether the document content had to be truncated
    pub truncated: bool,
}

/// Deterministically builds provider instructions from named slots and
/// verifies the result fits the token budget.
///
/// Construction order mirrors the documented precedence: taxonomy listing
/// or plain base prompt, restriction clauses, predefined-tag replacement,
/// enrichment appendix, override replacement. Later sections are appended,
/// never substituted into earlier ones. The assembler holds only owned
/// copies of its inputs; caller-supplied lists are never mutated.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    base_prompt: String,
    must_have_template: String,
    custom_fields: Vec<CustomField>,
    existing_tags: Vec<String>,
    existing_correspondents: Vec<String>,
    existing_document_types: Vec<String>,
    use_existing_data: bool,
    restrictions: RestrictionFlags,
    predefined_tags: Option<Vec<String>>,
    override_prompt: Option<String>,
    enrichment: Option<String>,
    model_id: String,
    token_limit: usize,
    response_tokens: usize,
}

impl PromptAssembler {
    /// Create an assembler for the given base prompt and model.
    ///
    /// The token limit defaults to the model's context window and the
    /// response reservation to `min(max_output_tokens, 4096)`.
    pub fn new(base_prompt: impl Into<String>, model_id: impl Into<String>) -> Self {
        let model_id = model_id.into();
        let profile = resolve(&model_id);
        Self {
            base_prompt: base_prompt.into(),
            must_have_template: DEFAULT_MUST_HAVE_TEMPLATE.to_string(),
            custom_fields: Vec::new(),
            existing_tags: Vec::new(),
            existing_correspondents: Vec::new(),
            existing_document_types: Vec::new(),
            use_existing_data: false,
            restrictions: RestrictionFlags::default(),
            predefined_tags: None,
            override_prompt: None,
            enrichment: None,
            model_id,
            token_limit: profile.context_window,
            response_tokens: profile.max_output_tokens.min(DEFAULT_RESPONSE_TOKEN_CAP),
        }
    }

    /// Replace the must-have output-shape template
    pub fn with_must_have_template(mut self, template: impl Into<String>) -> Self {
        self.must_have_template = template.into();
        self
    }

    /// Set the custom-field definitions substituted into the template
    pub fn with_custom_fields(mut self, fields: Vec<CustomField>) -> Self {
        self.custom_fields = fields;
        self
    }

    /// Provide the existing taxonomy lists
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

    /// Prepend the existing-taxonomy listing to the base prompt
    /// (only effective while no restriction flag is set)
    pub fn with_existing_data(mut self, enabled: bool) -> Self {
        self.use_existing_data = enabled;
        self
    }

    /// Set the restriction flags
    pub fn with_restrictions(mut self, flags: RestrictionFlags) -> Self {
        self.restrictions = flags;
        self
    }

    /// Enable predefined-tag mode with the given tag list
    pub fn with_predefined_tags(mut self, tags: Vec<String>) -> Self {
        self.predefined_tags = Some(tags);
        self
    }

    /// Replace the base/system portion with a caller-supplied prompt
    /// (the must-have shape template is still appended)
    pub fn with_override_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.override_prompt = Some(prompt.into());
        self
    }

    /// Attach sanitized external enrichment text
    pub fn with_enrichment(mut self, enrichment: Option<String>) -> Self {
        self.enrichment = enrichment;
        self
    }

    /// Override the overall token limit
    pub fn with_token_limit(mut self, limit: usize) -> Self {
        self.token_limit = limit;
        self
    }

    /// Override the response-token reservation
    pub fn with_response_tokens(mut self, tokens: usize) -> Self {
        self.response_tokens = tokens;
        self
    }

    /// Assemble the instructions and fit `content` into the remaining
    /// budget.
    ///
    /// Fails with [`PromptError::BudgetExceeded`] when the instructions
    /// plus the response reservation leave no room for content.
    pub fn assemble(&self, content: &str) -> Result<PromptBundle, PromptError> {
        let must_have = render_must_have_template(&self.must_have_template, &self.custom_fields);

        let mut side_segments: Vec<String> = Vec::new();

        let mut instructions = if let Some(override_prompt) = &self.override_prompt {
            debug!("override prompt replaces the system portion");
            format!("{override_prompt}\n\n{must_have}")
        } else if let Some(tags) = &self.predefined_tags {
            // Predefined-tag mode replaces the instructions entirely; the
            // tag list is counted as its own prompt segment.
            side_segments.push(tags.join(", "));
            render_predefined_tags_template(DEFAULT_PREDEFINED_TAGS_TEMPLATE, tags)
        } else {
            let base = if self.use_existing_data && !self.restrictions.any() {
                format!(
                    "Pre-existing tags: {}\n\nPre-existing correspondents: {}\n\nPre-existing document types: {}\n\n{}",
                    self.existing_tags.join(", "),
                    self.existing_correspondents.join(", "),
                    self.existing_document_types.join(", "),
                    self.base_prompt
                )
            } else {
                self.base_prompt.clone()
            };

            apply_restrictions(
                &format!("{base}\n\n{must_have}"),
                self.restrictions,
                &self.existing_tags,
                &self.existing_correspondents,
                &self.existing_document_types,
            )
        };

        if let Some(enrichment) = self.enrichment.as_deref().filter(|e| !e.is_empty()) {
            instructions.push_str("\n\nAdditional context from external API:\n");
            instructions.push_str(enrichment);
        }

        let side_refs: Vec<&str> = side_segments.iter().map(String::as_str).collect();
        let prompt_tokens = count_prompt_tokens(&instructions, &side_refs, &self.model_id);
        let reserved_tokens = prompt_tokens + self.response_tokens;

        if reserved_tokens >= self.token_limit {
            warn!(
                reserved_tokens,
                token_limit = self.token_limit,
                "no available tokens for content"
            );
            return Err(PromptError::BudgetExceeded {
                prompt_tokens,
                reserved_tokens,
                token_limit: self.token_limit,
            });
        }

        let available_tokens = self.token_limit - reserved_tokens;
        debug!(
            prompt_tokens,
            reserved_tokens, available_tokens, "token budget computed"
        );

        let truncated_content = truncate_to_token_limit(content, available_tokens, &self.model_id);
        let truncated = truncated_content.len() < content.len();

        Ok(PromptBundle {
            instructions,
            content: truncated_content,
            prompt_tokens,
            reserved_tokens,
            available_tokens,
            truncated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::restriction::RESTRICT_TAGS_SLOT;
    use crate::template::CUSTOM_FIELDS_SLOT;

    const MODEL: &str = "llama3.2";
    const BASE: &str = "You are a document analysis AI. Analyze the document.";

    fn assembler() -> PromptAssembler {
        PromptAssembler::new(BASE, MODEL)
            .with_token_limit(2_000)
            .with_response_tokens(100)
    }

    #[test]
    fn test_plain_assembly_contains_base_and_shape() {
        let bundle = assembler().assemble("document text").unwrap();

        assert!(bundle.instructions.starts_with(BASE));
        assert!(bundle.instructions.contains("\"document_date\": \"YYYY-MM-DD\""));
        assert!(!bundle.instructions.contains(CUSTOM_FIELDS_SLOT));
        assert_eq!(bundle.content, "document text");
        assert!(!bundle.truncated);
    }

    #[test]
    fn test_existing_data_prepends_taxonomy_listing() {
        let bundle = assembler()
            .with_existing_data(true)
            .with_taxonomy(
                vec!["Invoice".to_string()],
                vec!["Acme".to_string()],
                vec!["Letter".to_string()],
            )
            .assemble("text")
            .unwrap();

        assert!(bundle.instructions.starts_with("Pre-existing tags: Invoice"));
        assert!(bundle.instructions.contains("Pre-existing correspondents: Acme"));
        assert!(bundle.instructions.contains("Pre-existing document types: Letter"));
        assert!(bundle.instructions.contains(BASE));
    }

    #[test]
    fn test_restriction_flag_suppresses_taxonomy_listing() {
        let bundle = assembler()
            .with_existing_data(true)
            .with_taxonomy(vec!["Invoice".to_string()], vec![], vec![])
            .with_restrictions(RestrictionFlags {
                tags: true,
                ..Default::default()
            })
            .assemble("text")
            .unwrap();

        assert!(!bundle.instructions.contains("Pre-existing tags"));
    }

    #[test]
    fn test_restriction_slot_in_base_prompt_is_substituted() {
        let base = format!("{BASE}\n{RESTRICT_TAGS_SLOT}");
        let bundle = PromptAssembler::new(base, MODEL)
            .with_token_limit(2_000)
            .with_response_tokens(100)
            .with_taxonomy(vec!["Invoice".to_string(), "Receipt".to_string()], vec![], vec![])
            .with_restrictions(RestrictionFlags {
                tags: true,
                ..Default::default()
            })
            .assemble("text")
            .unwrap();

        assert!(bundle
            .instructions
            .contains("exclusively from this list: Invoice, Receipt"));
        assert!(!bundle.instructions.contains(RESTRICT_TAGS_SLOT));
    }

    #[test]
    fn test_predefined_tags_replace_instructions() {
        let bundle = assembler()
            .with_existing_data(true)
            .with_custom_fields(vec![CustomField {
                name: "Amount".to_string(),
            }])
            .with_predefined_tags(vec!["Finance".to_string(), "Legal".to_string()])
            .assemble("text")
            .unwrap();

        assert!(bundle.instructions.contains("a list of tags: Finance, Legal"));
        assert!(bundle.instructions.contains("Only use the tags from the list"));
        // The custom-field template does not survive predefined-tag mode
        assert!(!bundle.instructions.contains(CUSTOM_FIELDS_SLOT));
        assert!(!bundle.instructions.contains("field_name"));
        assert!(!bundle.instructions.contains(BASE));
    }

    #[test]
    fn test_enrichment_is_appended_under_heading() {
        let bundle = assembler()
            .with_enrichment(Some("supplier: Acme".to_string()))
            .assemble("text")
            .unwrap();

        assert!(bundle
            .instructions
            .ends_with("Additional context from external API:\nsupplier: Acme"));
    }

    #[test]
    fn test_enrichment_survives_predefined_mode() {
        let bundle = assembler()
            .with_predefined_tags(vec!["Finance".to_string()])
            .with_enrichment(Some("supplier: Acme".to_string()))
            .assemble("text")
            .unwrap();

        assert!(bundle.instructions.contains("Additional context from external API"));
    }

    #[test]
    fn test_override_replaces_base_but_keeps_shape() {
        let bundle = assembler()
            .with_existing_data(true)
            .with_taxonomy(vec!["Invoice".to_string()], vec![], vec![])
            .with_override_prompt("Classify strictly by legal relevance.")
            .assemble("text")
            .unwrap();

        assert!(bundle
            .instructions
            .starts_with("Classify strictly by legal relevance."));
        assert!(!bundle.instructions.contains(BASE));
        assert!(!bundle.instructions.contains("Pre-existing tags"));
        // The output-shape contract still applies
        assert!(bundle.instructions.contains("\"document_date\": \"YYYY-MM-DD\""));
    }

    #[test]
    fn test_budget_exhaustion_fails_hard() {
        let result = PromptAssembler::new(BASE, MODEL)
            .with_token_limit(50)
            .with_response_tokens(40)
            .assemble("content");

        assert!(matches!(result, Err(PromptError::BudgetExceeded { .. })));
    }

    #[test]
    fn test_budget_boundary_is_exclusive() {
        // Reserved tokens exactly equal to the limit must fail: zero
        // available tokens would silently truncate the document to nothing.
        let base = "abcd"; // 1 estimated token + 4 overhead
        let result = PromptAssembler::new(base, MODEL)
            .with_token_limit(25)
            .with_response_tokens(20)
            .assemble("content");

        assert!(matches!(result, Err(PromptError::BudgetExceeded { .. })));
    }

    #[test]
    fn test_bundle_invariant_holds() {
        let bundle = assembler().assemble("some document content").unwrap();
        assert_eq!(
            bundle.available_tokens,
            2_000 - bundle.reserved_tokens
        );
        assert_eq!(bundle.reserved_tokens, bundle.prompt_tokens + 100);
    }

    #[test]
    fn test_long_content_is_truncated_to_budget() {
        let content = "word ".repeat(10_000);
        let bundle = assembler().assemble(&content).unwrap();

        assert!(bundle.truncated);
        assert!(
            docent_tokens::count_tokens(&bundle.content, MODEL) <= bundle.available_tokens
        );
    }

    #[test]
    fn test_caller_lists_are_not_mutated() {
        let tags = vec!["Invoice".to_string()];
        let assembler = assembler().with_taxonomy(tags.clone(), vec![], vec![]);
        let _ = assembler.assemble("text").unwrap();
        // The assembler owns copies; the caller's list is untouched
        assert_eq!(tags, vec!["Invoice".to_string()]);
    }
}
