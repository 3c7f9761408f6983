//! JSON schema for the analysis output contract
//!
//! The schema is handed to the provider for enforced structured output;
//! its keys are the same wire contract [`crate::DocumentMetadata`]
//! serializes to.

use crate::metadata::CustomField;
use serde_json::{json, Value};

/// Build the response schema for document analysis.
///
/// When custom fields are configured, a `custom_fields` object is added to
/// the schema and marked required so the provider echoes it back.
pub fn document_analysis_schema(custom_fields: &[CustomField]) -> Value {
    let mut properties = json!({
        "title": {
            "type": "string",
            "description": "Concise, meaningful title for the document"
        },
        "correspondent": {
            "type": "string",
            "description": "Sender or institution (shortest form of company name)"
        },
        "tags": {
            "type": "array",
            "items": { "type": "string" },
            "minItems": 1,
            "maxItems": 4,
            "description": "Relevant thematic tags (1-4 tags)"
        },
        "document_type": {
            "type": "string",
            "description": "Type of document (e.g., Invoice, Contract, Receipt)"
        },
        "document_date": {
            "type": "string",
            "pattern": "^\\d{4}-\\d{2}-\\d{2}$",
            "description": "Document date in YYYY-MM-DD format"
        },
        "language": {
            "type": "string",
            "minLength": 2,
            "maxLength": 3,
            "description": "Document language code (e.g., en, de, es)"
        }
    });

    let mut required = vec![
        "title",
        "correspondent",
        "tags",
        "document_date",
        "language",
    ];

    if !custom_fields.is_empty() {
        properties["custom_fields"] = json!({
            "type": "object",
            "description": "Custom field values extracted from document",
            "additionalProperties": true
        });
        required.push("custom_fields");
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_without_custom_fields() {
        let schema = document_analysis_schema(&[]);

        assert_eq!(schema["type"], "object");
        assert!(schema["properties"]["title"].is_object());
        assert!(schema["properties"].get("custom_fields").is_none());

        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(
            required,
            vec!["title", "correspondent", "tags", "document_date", "language"]
        );
    }

    #[test]
    fn test_schema_with_custom_fields() {
        let fields = vec![CustomField {
            name: "Invoice Number".to_string(),
        }];
        let schema = document_analysis_schema(&fields);

        assert!(schema["properties"]["custom_fields"].is_object());
        assert!(schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .any(|v| v == "custom_fields"));
    }

    #[test]
    fn test_tags_bounded_one_to_four() {
        let schema = document_analysis_schema(&[]);
        assert_eq!(schema["properties"]["tags"]["minItems"], 1);
        assert_eq!(schema["properties"]["tags"]["maxItems"], 4);
    }

    #[test]
    fn test_date_pattern_enforced() {
        let schema = document_analysis_schema(&[]);
        assert_eq!(
            schema["properties"]["document_date"]["pattern"],
            "^\\d{4}-\\d{2}-\\d{2}$"
        );
    }
}
