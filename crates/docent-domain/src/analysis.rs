//! Analysis outcome types

use crate::metadata::DocumentMetadata;
use serde::{Deserialize, Serialize};

/// Token accounting reported by the provider for one request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt
    pub prompt_tokens: usize,

    /// Tokens produced in the completion
    pub completion_tokens: usize,

    /// Combined prompt and completion tokens
    pub total_tokens: usize,
}

/// The outcome of analyzing one document.
///
/// `document` is never absent: on total failure it degrades to
/// [`DocumentMetadata::placeholder`] rather than being omitted, so a
/// batch-oriented caller can proceed past a failed document without
/// special-casing exceptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Extracted metadata (placeholder on failure)
    pub document: DocumentMetadata,

    /// Provider-reported token usage, when the request reached the provider
    pub metrics: Option<TokenUsage>,

    /// Whether the document content was truncated to fit the token budget
    pub truncated: bool,

    /// Error marker for failed or degraded outcomes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResult {
    /// A fully successful analysis
    pub fn ok(document: DocumentMetadata, metrics: Option<TokenUsage>, truncated: bool) -> Self {
        Self {
            document,
            metrics,
            truncated,
            error: None,
        }
    }

    /// A degraded-success outcome: a usable placeholder document plus an
    /// error marker. Non-fatal and non-retryable.
    pub fn degraded(
        document: DocumentMetadata,
        metrics: Option<TokenUsage>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            document,
            metrics,
            truncated: false,
            error: Some(error.into()),
        }
    }

    /// A hard failure: minimal placeholder document, no metrics
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            document: DocumentMetadata::placeholder(),
            metrics: None,
            truncated: false,
            error: Some(error.into()),
        }
    }

    /// Whether this result carries an error marker (degraded or failed)
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_result_always_has_document() {
        let result = AnalysisResult::failed("provider unreachable");

        assert!(result.has_error());
        assert!(result.metrics.is_none());
        assert!(result.document.tags.is_empty());
        assert!(result.document.correspondent.is_none());
    }

    #[test]
    fn test_ok_result_has_no_error() {
        let doc = DocumentMetadata {
            title: Some("Invoice".to_string()),
            correspondent: Some("Acme".to_string()),
            tags: vec!["Invoice".to_string()],
            ..Default::default()
        };
        let result = AnalysisResult::ok(doc, None, false);

        assert!(!result.has_error());
        assert_eq!(result.document.title.as_deref(), Some("Invoice"));
    }
}
