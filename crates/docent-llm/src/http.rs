//! HTTP transport for OpenAI-compatible providers
//!
//! Speaks the responses API for schema-enforced document analysis and the
//! chat-completions API for plain text generation. Transport-level
//! failures (network errors, non-success HTTP) are retried with
//! exponential backoff; provider refusals and parse problems are not;
//! those belong to the response extractor.

use crate::endpoint::ProviderEndpoint;
use async_trait::async_trait;
use docent_domain::traits::LlmTransport;
use docent_domain::{CompletionRequest, ProviderReply, ProviderResponse, TokenUsage, TransportError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Default timeout for provider requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of attempts for transport-level failures
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Sampling temperature for plain text generation
const TEXT_TEMPERATURE: f32 = 0.7;

/// HTTP transport against an OpenAI-compatible endpoint
pub struct HttpTransport {
    endpoint: ProviderEndpoint,
    model: String,
    client: reqwest::Client,
    max_retries: u32,
}

#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    instructions: &'a str,
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

#[derive(Deserialize)]
struct ResponsesReply {
    #[serde(default)]
    output_parsed: Option<Value>,
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    usage: Option<UsageDto>,
    #[serde(default)]
    error: Option<ApiErrorDto>,
    #[serde(default)]
    incomplete_details: Option<Value>,
}

#[derive(Deserialize)]
struct ApiErrorDto {
    message: String,
}

#[derive(Deserialize)]
struct UsageDto {
    prompt_tokens: usize,
    completion_tokens: usize,
    total_tokens: usize,
}

impl From<UsageDto> for TokenUsage {
    fn from(u: UsageDto) -> Self {
        Self {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatReply {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Deserialize)]
struct ChatReplyMessage {
    content: String,
}

impl HttpTransport {
    /// Create a transport for the given endpoint and model
    pub fn new(endpoint: ProviderEndpoint, model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap();

        Self {
            endpoint,
            model: model.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Set the maximum number of retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// POST a JSON body, retrying transport failures with exponential
    /// backoff (1s, 2s, 4s, ...)
    async fn post_with_retry<B, R>(&self, url: &str, body: &B) -> Result<R, TransportError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let (auth_name, auth_value) = self.endpoint.auth_header();
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self
                .client
                .post(url)
                .header(auth_name, auth_value.as_str())
                .json(body)
                .send()
                .await
            {
                Ok(response) => {
                    if response.status().is_success() {
                        return response.json::<R>().await.map_err(|e| {
                            TransportError::InvalidResponse(format!(
                                "Failed to parse response: {e}"
                            ))
                        });
                    } else if response.status() == reqwest::StatusCode::NOT_FOUND {
                        return Err(TransportError::ModelNotAvailable(self.model.clone()));
                    } else {
                        let status = response.status();
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(TransportError::Communication(format!(
                            "HTTP {status}: {error_text}"
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(TransportError::Communication(format!(
                        "Request failed: {e}"
                    )));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| TransportError::Communication("Max retries exceeded".to_string())))
    }
}

#[async_trait]
impl LlmTransport for HttpTransport {
    async fn complete(&self, request: CompletionRequest) -> Result<ProviderResponse, TransportError> {
        let url = self.endpoint.url("responses");

        let response_format = request.schema.as_ref().map(|schema| {
            json!({
                "type": "json_schema",
                "json_schema": {
                    "name": "document_analysis",
                    "strict": true,
                    "schema": schema
                }
            })
        });

        let body = ResponsesRequest {
            model: &request.model,
            instructions: &request.instructions,
            input: &request.input,
            temperature: request.temperature,
            max_output_tokens: request.max_output_tokens,
            response_format,
        };

        let reply: ResponsesReply = self.post_with_retry(&url, &body).await?;

        if let Some(error) = reply.error {
            return Err(TransportError::Provider(error.message));
        }
        if let Some(details) = &reply.incomplete_details {
            warn!(?details, "provider reported an incomplete response");
        }

        let usage = reply.usage.map(TokenUsage::from);
        debug!(model = %request.model, has_usage = usage.is_some(), "completion received");

        let provider_reply = match reply.output_parsed {
            Some(parsed) => ProviderReply::StructuredOutput(parsed),
            None => ProviderReply::RawText(reply.output_text.unwrap_or_default()),
        };

        Ok(ProviderResponse {
            reply: provider_reply,
            usage,
        })
    }

    async fn generate_text(&self, prompt: &str) -> Result<String, TransportError> {
        let url = self.endpoint.url("chat/completions");

        let temperature =
            docent_tokens::supports_temperature(&self.model).then_some(TEXT_TEMPERATURE);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
        };

        let reply: ChatReply = self.post_with_retry(&url, &body).await?;

        reply
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                TransportError::InvalidResponse("Invalid API response structure".to_string())
            })
    }

    async fn check_status(&self) -> Result<(), TransportError> {
        let text = self.generate_text("Test").await?;
        if text.is_empty() {
            return Err(TransportError::InvalidResponse(
                "Empty response from status probe".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::ProviderEndpoint;

    #[test]
    fn test_transport_creation() {
        let endpoint = ProviderEndpoint::ollama("http://localhost:11434");
        let transport = HttpTransport::new(endpoint, "llama3.2");
        assert_eq!(transport.model, "llama3.2");
        assert_eq!(transport.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn test_with_max_retries() {
        let endpoint = ProviderEndpoint::ollama("http://localhost:11434");
        let transport = HttpTransport::new(endpoint, "llama3.2").with_max_retries(5);
        assert_eq!(transport.max_retries, 5);
    }

    #[test]
    fn test_responses_request_omits_absent_fields() {
        let body = ResponsesRequest {
            model: "llama3.2",
            instructions: "instructions",
            input: "input",
            temperature: None,
            max_output_tokens: None,
            response_format: None,
        };

        let serialized = serde_json::to_value(&body).unwrap();
        assert!(serialized.get("temperature").is_none());
        assert!(serialized.get("max_output_tokens").is_none());
        assert!(serialized.get("response_format").is_none());
    }

    #[test]
    fn test_responses_reply_tolerates_missing_fields() {
        let reply: ResponsesReply = serde_json::from_str(r#"{"output_text": "hello"}"#).unwrap();
        assert!(reply.output_parsed.is_none());
        assert_eq!(reply.output_text.as_deref(), Some("hello"));
        assert!(reply.usage.is_none());
    }

    #[tokio::test]
    async fn test_transport_error_on_unreachable_endpoint() {
        let endpoint = ProviderEndpoint::custom("http://127.0.0.1:1", "key").unwrap();
        let transport = HttpTransport::new(endpoint, "test-model").with_max_retries(1);

        let result = transport.generate_text("test").await;
        assert!(matches!(result, Err(TransportError::Communication(_))));
    }
}
