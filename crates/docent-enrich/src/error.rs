//! Error types for external enrichment

use thiserror::Error;

/// Errors that can occur while fetching enrichment data.
///
/// These never escape [`crate::EnrichmentFetcher::fetch`]; they are
/// logged and collapsed to `None` so enrichment cannot abort document
/// processing. The type exists for the validation helpers, which callers
/// may use directly.
#[derive(Error, Debug)]
pub enum EnrichError {
    /// URL failed SSRF validation
    #[error("URL validation failed: {0}")]
    UrlValidation(String),

    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Configuration is malformed (headers, body, method)
    #[error("Configuration error: {0}")]
    Config(String),
}
