//! Refusal classification
//!
//! When the provider answers with prose instead of JSON, the text is
//! checked for refusal language ("I'm sorry, but I cannot..."). A match
//! is a degraded success rather than a hard failure, so retry loops do
//! not resubmit a document the provider has already refused.
//!
//! Substring matching on free-form model text is inherently brittle and
//! can misclassify legitimate content that quotes such phrases; the
//! marker list is configurable for exactly that reason.

/// Error marker attached to degraded results for refused documents
pub const INSUFFICIENT_CONTENT_ERROR: &str = "Insufficient content for AI analysis";

/// Markers used when none are configured
const DEFAULT_MARKERS: &[&str] = &["i'm sorry", "i cannot", "insufficient"];

/// Classifies provider text as a refusal via case-insensitive substring
/// matching against a configurable marker list
#[derive(Debug, Clone)]
pub struct RefusalClassifier {
    markers: Vec<String>,
}

impl RefusalClassifier {
    /// Create a classifier with custom markers (matched case-insensitively)
    pub fn new(markers: Vec<String>) -> Self {
        Self {
            markers: markers.into_iter().map(|m| m.to_lowercase()).collect(),
        }
    }

    /// Whether the given provider text reads as a refusal
    pub fn is_refusal(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.markers.iter().any(|marker| lower.contains(marker))
    }
}

impl Default for RefusalClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_MARKERS.iter().map(|m| m.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_markers_match() {
        let classifier = RefusalClassifier::default();

        assert!(classifier.is_refusal("I'm sorry, but I cannot process this."));
        assert!(classifier.is_refusal("I CANNOT read the document"));
        assert!(classifier.is_refusal("The document has insufficient text."));
    }

    #[test]
    fn test_plain_text_is_not_a_refusal() {
        let classifier = RefusalClassifier::default();

        assert!(!classifier.is_refusal("Here is the analysis you asked for"));
        assert!(!classifier.is_refusal(""));
    }

    #[test]
    fn test_custom_markers_replace_defaults() {
        let classifier = RefusalClassifier::new(vec!["unable to comply".to_string()]);

        assert!(classifier.is_refusal("I am UNABLE TO COMPLY with this request"));
        // The defaults are gone
        assert!(!classifier.is_refusal("I'm sorry, but I cannot process this."));
    }
}
