//! Docent External Enrichment
//!
//! Fetches optional context data from a configured external API for
//! inclusion in analysis prompts.
//!
//! # Contract
//!
//! Enrichment is strictly best-effort: a disabled integration, a failed
//! request, an invalid URL, or a broken transform all resolve to `None`,
//! never to an error that could block document processing. The fetched
//! value is bounded later by the prompt sanitizer before it can reach a
//! prompt.
//!
//! # Safety
//!
//! Outbound URLs are validated against SSRF targets (loopback, private
//! and link-local ranges, cloud metadata endpoints) before any request is
//! made, and response transforms are limited to plain property paths with
//! a bounded depth.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod fetcher;
mod transform;
mod url_check;

pub use error::EnrichError;
pub use fetcher::{EnrichmentConfig, EnrichmentFetcher};
pub use transform::{apply_transform, MAX_TRANSFORM_DEPTH};
pub use url_check::{validate_api_url, validate_url, validate_url_against_base, UrlOptions};
