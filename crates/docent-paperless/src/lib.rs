//! Docent Paperless Client
//!
//! Thin client for a Paperless-ngx style document-management API,
//! implementing the `DocumentStore` trait from `docent-domain`.
//!
//! # Scope
//!
//! This crate is deliberately glue: fetch document text and taxonomy
//! lists, write analysis metadata back, append the processed-marker tag.
//! Tag, correspondent, and document-type names are resolved to ids on
//! write, creating missing entries as needed. Pagination links returned
//! by the API are validated against the configured base URL before they
//! are followed.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod client;

pub use client::PaperlessClient;
