//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the analysis core and
//! infrastructure. Implementations live in other crates.

use crate::metadata::DocumentMetadata;
use crate::response::{CompletionRequest, ProviderResponse};
use async_trait::async_trait;
use thiserror::Error;

/// Identifier assigned to a document by the document-management system
pub type DocumentId = u64;

/// A document as fetched from the document-management system
#[derive(Debug, Clone)]
pub struct DocumentContent {
    /// Document identifier
    pub id: DocumentId,

    /// Current title in the document-management system
    pub title: String,

    /// Full extracted text
    pub content: String,
}

/// Errors from the AI provider transport
#[derive(Error, Debug)]
pub enum TransportError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Provider returned an error payload
    #[error("Provider error: {0}")]
    Provider(String),

    /// Response body could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available at the endpoint
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Transport not configured (missing credentials or endpoint)
    #[error("Transport not initialized: {0}")]
    NotInitialized(String),
}

/// Errors from the document store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Document does not exist
    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    /// Response body could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Trait for AI provider transports
///
/// Implemented by the infrastructure layer (docent-llm)
#[async_trait]
pub trait LlmTransport: Send + Sync {
    /// Dispatch a completion request and return the provider's reply
    async fn complete(&self, request: CompletionRequest) -> Result<ProviderResponse, TransportError>;

    /// Generate plain text from a prompt (no schema enforcement)
    async fn generate_text(&self, prompt: &str) -> Result<String, TransportError>;

    /// Probe provider connectivity with a minimal request
    async fn check_status(&self) -> Result<(), TransportError>;
}

/// Trait for the document-management system
///
/// Implemented by the infrastructure layer (docent-paperless)
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document's extracted text
    async fn fetch_document(&self, id: DocumentId) -> Result<DocumentContent, StoreError>;

    /// List all existing tag names
    async fn list_tags(&self) -> Result<Vec<String>, StoreError>;

    /// List all existing correspondent names
    async fn list_correspondents(&self) -> Result<Vec<String>, StoreError>;

    /// List all existing document type names
    async fn list_document_types(&self) -> Result<Vec<String>, StoreError>;

    /// List documents that do not yet carry the given marker tag
    async fn list_unprocessed(&self, marker_tag: &str) -> Result<Vec<DocumentContent>, StoreError>;

    /// Fetch a document's thumbnail image bytes
    async fn fetch_thumbnail(&self, id: DocumentId) -> Result<Vec<u8>, StoreError>;

    /// Persist analysis metadata back to the document
    async fn update_metadata(
        &self,
        id: DocumentId,
        metadata: &DocumentMetadata,
    ) -> Result<(), StoreError>;

    /// Append a single tag to a document, creating the tag if needed
    async fn append_tag(&self, id: DocumentId, tag: &str) -> Result<(), StoreError>;
}
