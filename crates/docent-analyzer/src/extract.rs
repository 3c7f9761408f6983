//! Response extraction
//!
//! Turns a provider reply into document metadata, falling back through
//! degrading strategies: structured output, fence-stripped JSON parse of
//! raw text, refusal classification.

use crate::classify::RefusalClassifier;
use crate::error::AnalyzerError;
use docent_domain::{DocumentMetadata, ProviderReply};
use serde_json::Value;
use tracing::warn;

/// Outcome of extracting a provider reply
#[derive(Debug)]
pub(crate) enum Extraction {
    /// A shape-valid document
    Valid(DocumentMetadata),

    /// The provider refused; callers emit a degraded placeholder
    Insufficient,
}

/// Extract document metadata from a provider reply.
///
/// Structured output is accepted only after a shape re-check (tags must
/// be an array, correspondent textual); a failed re-check escalates to an
/// error rather than silently coercing.
/// Raw text is fence-stripped and strictly parsed; unparseable text is
/// classified as either a refusal or invalid JSON.
pub(crate) fn extract_document(
    reply: &ProviderReply,
    classifier: &RefusalClassifier,
) -> Result<Extraction, AnalyzerError> {
    match reply {
        ProviderReply::StructuredOutput(value) => parse_value(value).map(Extraction::Valid),
        ProviderReply::RawText(text) => {
            let stripped = strip_code_fences(text);
            match serde_json::from_str::<Value>(&stripped) {
                Ok(value) => parse_value(&value).map(Extraction::Valid),
                Err(err) => {
                    warn!(%err, "failed to parse provider text as JSON");
                    if classifier.is_refusal(text) {
                        Ok(Extraction::Insufficient)
                    } else {
                        Err(AnalyzerError::InvalidJson)
                    }
                }
            }
        }
    }
}

/// Shape re-check plus deserialization.
///
/// The provider-side schema should enforce this already, but a reply that
/// violates it despite schema validation is an error, not something to
/// coerce.
fn parse_value(value: &Value) -> Result<DocumentMetadata, AnalyzerError> {
    let tags_ok = value.get("tags").map(Value::is_array).unwrap_or(false);
    let correspondent_ok = value
        .get("correspondent")
        .map(Value::is_string)
        .unwrap_or(false);

    if !tags_ok || !correspondent_ok {
        return Err(AnalyzerError::InvalidStructure);
    }

    serde_json::from_value(value.clone()).map_err(|err| {
        warn!(%err, "schema-validated reply failed deserialization");
        AnalyzerError::InvalidStructure
    })
}

/// Remove markdown code-fence wrapping from provider text
pub(crate) fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn classifier() -> RefusalClassifier {
        RefusalClassifier::default()
    }

    fn valid_document() -> Value {
        json!({
            "title": "Invoice #1",
            "correspondent": "Acme Corp",
            "tags": ["Invoice"],
            "document_date": "2024-01-01",
            "language": "en"
        })
    }

    #[test]
    fn test_structured_output_passes_through() {
        let reply = ProviderReply::StructuredOutput(valid_document());
        let result = extract_document(&reply, &classifier()).unwrap();

        match result {
            Extraction::Valid(doc) => {
                assert_eq!(doc.title.as_deref(), Some("Invoice #1"));
                assert_eq!(doc.correspondent.as_deref(), Some("Acme Corp"));
                assert_eq!(doc.tags, vec!["Invoice"]);
                assert_eq!(doc.document_date.as_deref(), Some("2024-01-01"));
                assert_eq!(doc.language.as_deref(), Some("en"));
            }
            other => panic!("expected valid extraction, got {other:?}"),
        }
    }

    #[test]
    fn test_structured_output_missing_tags_escalates() {
        let reply = ProviderReply::StructuredOutput(json!({
            "title": "X",
            "correspondent": "Acme"
        }));
        let result = extract_document(&reply, &classifier());
        assert!(matches!(result, Err(AnalyzerError::InvalidStructure)));
    }

    #[test]
    fn test_structured_output_non_string_correspondent_escalates() {
        let reply = ProviderReply::StructuredOutput(json!({
            "title": "X",
            "correspondent": 42,
            "tags": []
        }));
        let result = extract_document(&reply, &classifier());
        assert!(matches!(result, Err(AnalyzerError::InvalidStructure)));
    }

    #[test]
    fn test_raw_text_json_parses() {
        let reply = ProviderReply::RawText(valid_document().to_string());
        let result = extract_document(&reply, &classifier()).unwrap();
        assert!(matches!(result, Extraction::Valid(_)));
    }

    #[test]
    fn test_raw_text_with_markdown_fences() {
        let text = format!("```json\n{}\n```", valid_document());
        let reply = ProviderReply::RawText(text);
        let result = extract_document(&reply, &classifier()).unwrap();
        assert!(matches!(result, Extraction::Valid(_)));
    }

    #[test]
    fn test_refusal_text_classified_as_insufficient() {
        let reply = ProviderReply::RawText("I'm sorry, but I cannot process this.".to_string());
        let result = extract_document(&reply, &classifier()).unwrap();
        assert!(matches!(result, Extraction::Insufficient));
    }

    #[test]
    fn test_garbage_text_is_invalid_json() {
        let reply = ProviderReply::RawText("here are your results: none".to_string());
        let result = extract_document(&reply, &classifier());
        assert!(matches!(result, Err(AnalyzerError::InvalidJson)));
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn test_custom_fields_survive_extraction() {
        let mut doc = valid_document();
        doc["custom_fields"] = json!({"0": {"field_name": "Amount", "value": "12.50"}});
        let reply = ProviderReply::StructuredOutput(doc);

        match extract_document(&reply, &classifier()).unwrap() {
            Extraction::Valid(meta) => {
                let fields = meta.custom_fields.unwrap();
                assert_eq!(fields["0"]["field_name"], "Amount");
            }
            other => panic!("expected valid extraction, got {other:?}"),
        }
    }
}
