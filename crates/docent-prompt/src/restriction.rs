//! Restriction-clause substitution
//!
//! Restriction placeholders are named slots substituted independently per
//! flag, so combining optional sections cannot reorder or clobber each
//! other. An unset flag clears its slot.

/// Slot replaced by the tag restriction clause
pub const RESTRICT_TAGS_SLOT: &str = "%RESTRICTEDTAGS%";

/// Slot replaced by the correspondent restriction clause
pub const RESTRICT_CORRESPONDENTS_SLOT: &str = "%RESTRICTEDCORRESPONDENTS%";

/// Slot replaced by the document-type restriction clause
pub const RESTRICT_DOCUMENT_TYPES_SLOT: &str = "%RESTRICTEDDOCTYPES%";

/// Which taxonomy dimensions are restricted to existing values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestrictionFlags {
    /// Restrict tags to the existing tag list
    pub tags: bool,

    /// Restrict the correspondent to the existing correspondent list
    pub correspondents: bool,

    /// Restrict the document type to the existing type list
    pub document_types: bool,
}

impl RestrictionFlags {
    /// Whether any restriction is active
    pub fn any(&self) -> bool {
        self.tags || self.correspondents || self.document_types
    }
}

fn clause(kind: &str, values: &[String]) -> String {
    format!(
        "You MUST choose the {kind} exclusively from this list: {}. Do not invent values outside of it.",
        values.join(", ")
    )
}

/// Substitute restriction slots in assembled instruction text.
///
/// Each slot is handled independently: an active flag injects a concrete
/// choose-only-from-this-list clause, an inactive flag clears the slot.
/// The input lists are read-only; the caller's data is never mutated.
pub fn apply_restrictions(
    text: &str,
    flags: RestrictionFlags,
    tags: &[String],
    correspondents: &[String],
    document_types: &[String],
) -> String {
    let tag_clause = if flags.tags {
        clause("tags", tags)
    } else {
        String::new()
    };
    let correspondent_clause = if flags.correspondents {
        clause("correspondent", correspondents)
    } else {
        String::new()
    };
    let type_clause = if flags.document_types {
        clause("document type", document_types)
    } else {
        String::new()
    };

    text.replace(RESTRICT_TAGS_SLOT, &tag_clause)
        .replace(RESTRICT_CORRESPONDENTS_SLOT, &correspondent_clause)
        .replace(RESTRICT_DOCUMENT_TYPES_SLOT, &type_clause)
}
