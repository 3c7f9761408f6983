//! Prompt templates with named slots
//!
//! Templates are rendered by pure functions returning new strings; shared
//! configuration is never mutated in place.

use docent_domain::CustomField;

/// Slot in the must-have template replaced by the custom-fields block
pub const CUSTOM_FIELDS_SLOT: &str = "%CUSTOMFIELDS%";

/// Slot in the predefined-tags template replaced by the tag list
pub const PREDEFINED_TAGS_SLOT: &str = "%PREDEFINEDTAGS%";

/// The required output-shape contract appended to every prompt.
///
/// The JSON keys here are the wire contract; the response schema enforces
/// the same shape on the provider side.
pub const DEFAULT_MUST_HAVE_TEMPLATE: &str = r#"Return the result EXCLUSIVELY as a JSON object. The Tags, Title and Document_Type MUST be in the language that is used in the document.:
IMPORTANT: The custom_fields are optional and can be left out if not needed, only try to fill out the values if you find a matching information in the document.
Do not change the value of field_name, only fill out the values. If the field is about money only add the number without currency and always use a . for decimal places.
{
  "title": "xxxxx",
  "correspondent": "xxxxxxxx",
  "tags": ["Tag1", "Tag2", "Tag3", "Tag4"],
  "document_type": "Invoice/Contract/...",
  "document_date": "YYYY-MM-DD",
  "language": "en/de/es/...",
  %CUSTOMFIELDS%
}"#;

/// Instruction template for predefined-tag mode.
///
/// Replaces the assembled instructions entirely: the model matches the
/// document against an exact given tag list instead of inventing tags.
pub const DEFAULT_PREDEFINED_TAGS_TEMPLATE: &str = r#"Take these tags and try to match one or more to the document content.

You are a document analysis AI. You will analyze the document.
You take the main information to associate tags with the document.
You will also find the correspondent of the document (Sender not receiver). Also you find a meaningful and short title for the document.
You are given a list of tags: %PREDEFINEDTAGS%
Only use the tags from the list and try to find the best fitting tags.
You do not ask for additional information, you only use the information given in the document.

Return the result EXCLUSIVELY as a JSON object. The Tags and Title MUST be in the language that is used in the document.:
{
  "title": "xxxxx",
  "correspondent": "xxxxxxxx",
  "tags": ["Tag1", "Tag2", "Tag3", "Tag4"],
  "document_date": "YYYY-MM-DD",
  "language": "en/de/es/..."
}"#;

/// Value the model is asked to fill in for each custom field
const CUSTOM_FIELD_FILL_HINT: &str = "Fill in the value based on your analysis";

/// Render the custom-fields JSON block substituted into the must-have
/// template.
///
/// Fields are keyed by their configuration index so the model echoes them
/// back in a stable order. An empty definition list renders as `{}`.
pub fn render_custom_fields_block(fields: &[CustomField]) -> String {
    if fields.is_empty() {
        return "\"custom_fields\": {}".to_string();
    }

    let mut block = String::from("\"custom_fields\": {\n");
    for (index, field) in fields.iter().enumerate() {
        // serde_json handles quoting and escaping of the field name
        let name = serde_json::Value::String(field.name.clone()).to_string();
        block.push_str(&format!(
            "    \"{index}\": {{\n      \"field_name\": {name},\n      \"value\": \"{CUSTOM_FIELD_FILL_HINT}\"\n    }}"
        ));
        if index + 1 < fields.len() {
            block.push(',');
        }
        block.push('\n');
    }
    block.push_str("  }");
    block
}

/// Substitute the custom-fields slot in a must-have template.
///
/// Pure: returns a new string, leaving the template untouched.
pub fn render_must_have_template(template: &str, fields: &[CustomField]) -> String {
    template.replace(CUSTOM_FIELDS_SLOT, &render_custom_fields_block(fields))
}

/// Substitute the tag-list slot in a predefined-tags template
pub fn render_predefined_tags_template(template: &str, tags: &[String]) -> String {
    template.replace(PREDEFINED_TAGS_SLOT, &tags.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str) -> CustomField {
        CustomField {
            name: name.to_string(),
        }
    }

    #[test]
    fn test_empty_custom_fields_render_as_empty_object() {
        let rendered = render_must_have_template(DEFAULT_MUST_HAVE_TEMPLATE, &[]);
        assert!(rendered.contains("\"custom_fields\": {}"));
        assert!(!rendered.contains(CUSTOM_FIELDS_SLOT));
    }

    #[test]
    fn test_custom_fields_block_is_indexed() {
        let block = render_custom_fields_block(&[field("Invoice Number"), field("Amount")]);
        assert!(block.contains("\"0\""));
        assert!(block.contains("\"1\""));
        assert!(block.contains("\"field_name\": \"Invoice Number\""));
        assert!(block.contains("\"field_name\": \"Amount\""));
        assert!(block.contains("Fill in the value based on your analysis"));
    }

    #[test]
    fn test_custom_field_names_are_json_escaped() {
        let block = render_custom_fields_block(&[field("Betrag \"netto\"")]);
        assert!(block.contains(r#""field_name": "Betrag \"netto\"""#));
    }

    #[test]
    fn test_render_does_not_mutate_template() {
        let template = DEFAULT_MUST_HAVE_TEMPLATE;
        let _ = render_must_have_template(template, &[field("X")]);
        // The constant still carries the slot for the next caller
        assert!(template.contains(CUSTOM_FIELDS_SLOT));
    }

    #[test]
    fn test_predefined_tags_substitution() {
        let rendered = render_predefined_tags_template(
            DEFAULT_PREDEFINED_TAGS_TEMPLATE,
            &["Finance".to_string(), "Legal".to_string()],
        );
        assert!(rendered.contains("a list of tags: Finance, Legal"));
        assert!(!rendered.contains(PREDEFINED_TAGS_SLOT));
        assert!(!rendered.contains(CUSTOM_FIELDS_SLOT));
    }
}
