//! Docent LLM Transport Layer
//!
//! Pluggable AI provider transports behind the `LlmTransport` trait from
//! `docent-domain`.
//!
//! # Architecture
//!
//! Transports own the provider wire format and resolve the provider SDK's
//! optional-field probing (`output_parsed` vs `output_text`) into the
//! explicit [`docent_domain::ProviderReply`] union. The analysis core
//! never sees provider DTOs.
//!
//! # Transports
//!
//! - `MockTransport`: deterministic canned responses for testing
//! - `HttpTransport`: OpenAI-compatible endpoints (OpenAI, Ollama via its
//!   `/v1` compatibility surface, Azure deployments, custom base URLs)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod endpoint;
pub mod http;

use async_trait::async_trait;
use docent_domain::traits::LlmTransport;
use docent_domain::{CompletionRequest, ProviderResponse, TransportError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub use endpoint::{ProviderEndpoint, ProviderKind, OLLAMA_DEFAULT_URL, OPENAI_BASE_URL};
pub use http::HttpTransport;

/// Mock transport for deterministic testing
///
/// Returns queued responses in order, falling back to a default. Records
/// every request so tests can assert on what was dispatched.
///
/// # Examples
///
/// ```
/// use docent_llm::MockTransport;
///
/// let transport = MockTransport::raw("{\"title\": \"Invoice\"}");
/// assert_eq!(transport.call_count(), 0);
/// ```
#[derive(Clone)]
pub struct MockTransport {
    default_response: ProviderResponse,
    queue: Arc<Mutex<VecDeque<Result<ProviderResponse, String>>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockTransport {
    /// Create a mock that answers every request with the given response
    pub fn new(default_response: ProviderResponse) -> Self {
        Self {
            default_response,
            queue: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Mock answering with a structured-output reply
    pub fn structured(value: serde_json::Value) -> Self {
        Self::new(ProviderResponse::structured(value, None))
    }

    /// Mock answering with a raw-text reply
    pub fn raw(text: impl Into<String>) -> Self {
        Self::new(ProviderResponse::raw_text(text, None))
    }

    /// Queue a response consumed before the default
    pub fn push_response(&self, response: ProviderResponse) {
        self.queue.lock().unwrap().push_back(Ok(response));
    }

    /// Queue a transport error consumed before the default
    pub fn push_error(&self, message: impl Into<String>) {
        self.queue.lock().unwrap().push_back(Err(message.into()));
    }

    /// Number of completion requests dispatched so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The most recent completion request, if any
    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LlmTransport for MockTransport {
    async fn complete(&self, request: CompletionRequest) -> Result<ProviderResponse, TransportError> {
        self.requests.lock().unwrap().push(request);

        match self.queue.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(TransportError::Communication(message)),
            None => Ok(self.default_response.clone()),
        }
    }

    async fn generate_text(&self, _prompt: &str) -> Result<String, TransportError> {
        match &self.default_response.reply {
            docent_domain::ProviderReply::RawText(text) => Ok(text.clone()),
            docent_domain::ProviderReply::StructuredOutput(value) => Ok(value.to_string()),
        }
    }

    async fn check_status(&self) -> Result<(), TransportError> {
        Ok(())
    }
}
