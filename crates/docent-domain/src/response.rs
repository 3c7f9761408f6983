//! Provider request and response shapes

use crate::analysis::TokenUsage;
use serde_json::Value;

/// A completion request dispatched to the AI provider.
///
/// `instructions` carries the assembled system prompt; `input` carries the
/// (already truncated) document content.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Target model identifier
    pub model: String,

    /// Assembled instruction text
    pub instructions: String,

    /// Document content, truncated to the token budget
    pub input: String,

    /// Sampling temperature, omitted for model families that reject it
    pub temperature: Option<f32>,

    /// Cap on response tokens
    pub max_output_tokens: Option<usize>,

    /// JSON schema for provider-enforced structured output
    pub schema: Option<Value>,
}

/// The two shapes a provider reply can take.
///
/// The transport adapter resolves the provider SDK's optional-field probing
/// into this union, so the response extractor operates on a clean variant.
#[derive(Debug, Clone)]
pub enum ProviderReply {
    /// A schema-validated parsed object returned directly by the provider
    StructuredOutput(Value),

    /// Raw text output; may contain JSON, markdown fencing, or a refusal
    RawText(String),
}

/// A provider response: the reply plus reported token usage
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// The reply payload
    pub reply: ProviderReply,

    /// Token usage, when the provider reported it
    pub usage: Option<TokenUsage>,
}

impl ProviderResponse {
    /// A structured-output response (convenience for tests and adapters)
    pub fn structured(value: Value, usage: Option<TokenUsage>) -> Self {
        Self {
            reply: ProviderReply::StructuredOutput(value),
            usage,
        }
    }

    /// A raw-text response
    pub fn raw_text(text: impl Into<String>, usage: Option<TokenUsage>) -> Self {
        Self {
            reply: ProviderReply::RawText(text.into()),
            usage,
        }
    }
}
