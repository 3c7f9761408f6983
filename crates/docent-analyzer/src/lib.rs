//! Docent Analyzer
//!
//! The document-analysis core: assembles the prompt under the token
//! budget, dispatches it to the AI provider, and turns the reply into a
//! validated [`docent_domain::AnalysisResult`].
//!
//! # Architecture
//!
//! ```text
//! Document text → PromptAssembler → LlmTransport → Response extraction → AnalysisResult
//! ```
//!
//! # Failure contract
//!
//! [`DocumentAnalyzer::analyze`] never propagates expected failures:
//! budget exhaustion, transport errors, malformed replies, and provider
//! refusals all resolve to a structured result carrying a placeholder
//! document and an error marker. Batch callers iterate on without
//! special-casing exceptions.
//!
//! A provider refusal ("insufficient content") is a *degraded success*,
//! distinct from a hard failure: it is terminal and must not be retried,
//! which the [`RetryTracker`] respects.
//!
//! # Example Usage
//!
//! ```no_run
//! use docent_analyzer::{AnalysisRequest, AnalyzerConfig, DocumentAnalyzer};
//! use docent_llm::MockTransport;
//!
//! # async fn example() {
//! let transport = MockTransport::raw("{}");
//! let config = AnalyzerConfig::for_model("gpt-5-nano");
//! let analyzer = DocumentAnalyzer::new(transport, config);
//!
//! let request = AnalysisRequest::new(42, "Invoice text ...");
//! let result = analyzer.analyze(request).await;
//!
//! println!("title: {:?}", result.document.title);
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod analyzer;
mod audit;
mod classify;
mod config;
mod error;
mod extract;
mod retry;

pub use analyzer::{AnalysisRequest, DocumentAnalyzer};
pub use audit::{AuditLog, DEFAULT_MAX_LOG_BYTES};
pub use classify::{RefusalClassifier, INSUFFICIENT_CONTENT_ERROR};
pub use config::AnalyzerConfig;
pub use error::AnalyzerError;
pub use retry::{RetryTracker, DEFAULT_MAX_ATTEMPTS};
