//! Error types for the analyzer

use docent_domain::TransportError;
use docent_prompt::PromptError;
use thiserror::Error;

/// Errors that can occur during document analysis.
///
/// These never escape [`crate::DocumentAnalyzer::analyze`]; they are
/// collapsed into the result's `error` field so batch callers can
/// continue past failed documents.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Prompt assembly failed (token budget exhausted)
    #[error(transparent)]
    Prompt(#[from] PromptError),

    /// The provider transport failed
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A structured reply did not carry the required shape
    #[error("Invalid response structure: missing tags array or correspondent string")]
    InvalidStructure,

    /// The raw-text fallback did not contain parseable JSON
    #[error("Invalid JSON response from provider")]
    InvalidJson,

    /// Configuration failed validation
    #[error("Configuration error: {0}")]
    Config(String),
}
