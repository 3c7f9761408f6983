//! Docent Domain Layer
//!
//! This crate contains the shared data model for the document-enrichment
//! pipeline and the trait interfaces that separate the analysis core from
//! its collaborators (the AI provider transport and the document store).
//!
//! ## Key Concepts
//!
//! - **DocumentMetadata**: the classification result written back to the
//!   document-management system (title, tags, correspondent, type, date,
//!   language, custom fields)
//! - **AnalysisResult**: the outcome of analyzing one document; always
//!   carries a document object, even on failure, so batch callers can
//!   continue past individual errors
//! - **ProviderReply**: tagged union over the two response shapes a
//!   provider can return (schema-validated structured output vs raw text)
//!
//! ## Architecture
//!
//! Infrastructure implementations live in other crates:
//! - `docent-llm` implements [`traits::LlmTransport`]
//! - `docent-paperless` implements [`traits::DocumentStore`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod metadata;
pub mod response;
pub mod schema;
pub mod traits;

// Re-exports for convenience
pub use analysis::{AnalysisResult, TokenUsage};
pub use metadata::{CustomField, CustomFieldList, DocumentMetadata};
pub use response::{CompletionRequest, ProviderReply, ProviderResponse};
pub use schema::document_analysis_schema;
pub use traits::{DocumentContent, DocumentId, StoreError, TransportError};
