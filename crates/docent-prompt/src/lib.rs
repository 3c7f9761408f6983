//! Docent Prompt Assembly
//!
//! Builds the instruction text sent to the AI provider and enforces the
//! token budget before anything is dispatched.
//!
//! # Overview
//!
//! A prompt is assembled from named slots in a fixed precedence order:
//! base system prompt, existing-taxonomy listing, restriction clauses,
//! predefined-tag mode, sanitized external enrichment, and an optional
//! per-request override. The required output shape (the must-have JSON
//! template) survives every mode.
//!
//! # Budget
//!
//! After assembly the instruction cost is computed via `docent-tokens`,
//! the response reservation is added, and assembly fails hard when no
//! budget remains for document content. Content that does fit is
//! truncated to the remaining budget.
//!
//! # External data
//!
//! [`sanitize_for_prompt`] is the only path by which untrusted enrichment
//! data enters a prompt; it bounds the payload to a token cap and resolves
//! every internal failure to "no enrichment available".

#![warn(missing_docs)]
#![warn(clippy::all)]

mod assembler;
mod error;
mod restriction;
mod sanitize;
mod template;

pub use assembler::{PromptAssembler, PromptBundle};
pub use error::PromptError;
pub use restriction::{
    apply_restrictions, RestrictionFlags, RESTRICT_CORRESPONDENTS_SLOT,
    RESTRICT_DOCUMENT_TYPES_SLOT, RESTRICT_TAGS_SLOT,
};
pub use sanitize::{sanitize_for_prompt, ENRICHMENT_TOKEN_CAP};
pub use template::{
    render_custom_fields_block, render_must_have_template, render_predefined_tags_template,
    CUSTOM_FIELDS_SLOT, DEFAULT_MUST_HAVE_TEMPLATE, DEFAULT_PREDEFINED_TAGS_TEMPLATE,
    PREDEFINED_TAGS_SLOT,
};
