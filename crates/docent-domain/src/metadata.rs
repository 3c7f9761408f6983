//! Document metadata produced by AI analysis

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Classification metadata for a single document.
///
/// The field names reproduce the provider output contract exactly
/// (case-sensitive JSON keys). `correspondent` is always serialized, even
/// when null, so callers can branch on it; the remaining optional fields
/// are omitted when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Concise, meaningful title for the document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Sender or institution (shortest form of the company name)
    pub correspondent: Option<String>,

    /// Thematic tags (1-4 on a successful analysis)
    #[serde(default)]
    pub tags: Vec<String>,

    /// Type of document (e.g. Invoice, Contract, Receipt)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,

    /// Document date in YYYY-MM-DD format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_date: Option<String>,

    /// Document language code (e.g. en, de, es)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Custom field values extracted from the document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<Map<String, Value>>,
}

impl DocumentMetadata {
    /// The minimal placeholder emitted when analysis fails outright.
    ///
    /// Carries empty tags and no correspondent so batch callers can always
    /// branch on the document object instead of special-casing errors.
    pub fn placeholder() -> Self {
        Self::default()
    }

    /// Whether this metadata carries any value worth persisting
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.correspondent.is_none()
            && self.tags.is_empty()
            && self.document_type.is_none()
    }
}

/// A custom field definition supplied by configuration.
///
/// The wire name of the field is `value` (the field's display name in the
/// document-management system).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    /// Display name of the field
    #[serde(rename = "value")]
    pub name: String,
}

/// The configured list of custom fields, as parsed from configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldList {
    /// Field definitions in configuration order
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
}

impl CustomFieldList {
    /// Parse the configured JSON value, falling back to an empty list on
    /// malformed input
    pub fn parse_lenient(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(list) => list,
            Err(_) => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_serializes_null_correspondent() {
        let meta = DocumentMetadata::placeholder();
        let json = serde_json::to_value(&meta).unwrap();

        assert_eq!(json["correspondent"], Value::Null);
        assert_eq!(json["tags"], serde_json::json!([]));
        assert!(json.get("title").is_none());
        assert!(json.get("document_date").is_none());
    }

    #[test]
    fn test_round_trip_preserves_all_fields() {
        let json = serde_json::json!({
            "title": "Invoice #1",
            "correspondent": "Acme Corp",
            "tags": ["Invoice"],
            "document_type": "Invoice",
            "document_date": "2024-01-01",
            "language": "en"
        });

        let meta: DocumentMetadata = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(meta.title.as_deref(), Some("Invoice #1"));
        assert_eq!(meta.correspondent.as_deref(), Some("Acme Corp"));
        assert_eq!(meta.tags, vec!["Invoice"]);

        let back = serde_json::to_value(&meta).unwrap();
        assert_eq!(back, json);
    }

    #[test]
    fn test_custom_fields_parse_lenient() {
        let list = CustomFieldList::parse_lenient(
            r#"{"custom_fields": [{"value": "Invoice Number"}, {"value": "Amount"}]}"#,
        );
        assert_eq!(list.custom_fields.len(), 2);
        assert_eq!(list.custom_fields[0].name, "Invoice Number");
    }

    #[test]
    fn test_custom_fields_parse_lenient_malformed() {
        let list = CustomFieldList::parse_lenient("not json at all");
        assert!(list.custom_fields.is_empty());
    }

    #[test]
    fn test_is_empty() {
        assert!(DocumentMetadata::placeholder().is_empty());

        let meta = DocumentMetadata {
            title: Some("Title".to_string()),
            ..Default::default()
        };
        assert!(!meta.is_empty());
    }
}
