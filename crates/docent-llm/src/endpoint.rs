//! Provider endpoint configuration
//!
//! Maps the four supported provider kinds to their base URLs and
//! authentication headers. Ollama is reached through its OpenAI
//! compatibility surface (`{base}/v1`).

use docent_domain::TransportError;

/// Default OpenAI API base URL
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default local Ollama endpoint
pub const OLLAMA_DEFAULT_URL: &str = "http://localhost:11434";

/// Placeholder key accepted by Ollama's compatibility endpoint
const OLLAMA_API_KEY: &str = "ollama";

/// Supported AI provider kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// The OpenAI API
    OpenAi,
    /// A local Ollama instance via its OpenAI-compatible surface
    Ollama,
    /// An Azure OpenAI deployment
    Azure,
    /// Any custom OpenAI-compatible endpoint
    Custom,
}

/// A resolved provider endpoint: base URL plus credentials
#[derive(Debug, Clone)]
pub struct ProviderEndpoint {
    kind: ProviderKind,
    base_url: String,
    api_key: String,
    api_version: Option<String>,
}

impl ProviderEndpoint {
    /// The OpenAI API with the given key
    pub fn openai(api_key: impl Into<String>) -> Result<Self, TransportError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(TransportError::NotInitialized(
                "missing OpenAI API key".to_string(),
            ));
        }
        Ok(Self {
            kind: ProviderKind::OpenAi,
            base_url: OPENAI_BASE_URL.to_string(),
            api_key,
            api_version: None,
        })
    }

    /// A local Ollama instance (`{base}/v1`)
    pub fn ollama(base_url: impl Into<String>) -> Self {
        Self {
            kind: ProviderKind::Ollama,
            base_url: format!("{}/v1", base_url.into().trim_end_matches('/')),
            api_key: OLLAMA_API_KEY.to_string(),
            api_version: None,
        }
    }

    /// An Azure OpenAI deployment
    pub fn azure(
        endpoint: impl Into<String>,
        deployment: impl Into<String>,
        api_key: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Result<Self, TransportError> {
        let api_key = api_key.into();
        let endpoint = endpoint.into();
        if api_key.is_empty() || endpoint.is_empty() {
            return Err(TransportError::NotInitialized(
                "missing Azure endpoint or API key".to_string(),
            ));
        }
        Ok(Self {
            kind: ProviderKind::Azure,
            base_url: format!(
                "{}/openai/deployments/{}",
                endpoint.trim_end_matches('/'),
                deployment.into()
            ),
            api_key,
            api_version: Some(api_version.into()),
        })
    }

    /// A custom OpenAI-compatible endpoint
    pub fn custom(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, TransportError> {
        let base_url = base_url.into();
        if base_url.is_empty() {
            return Err(TransportError::NotInitialized(
                "missing custom endpoint base URL".to_string(),
            ));
        }
        Ok(Self {
            kind: ProviderKind::Custom,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            api_version: None,
        })
    }

    /// The provider kind
    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// Full URL for an API path, including the Azure api-version query
    pub fn url(&self, path: &str) -> String {
        match &self.api_version {
            Some(version) => format!("{}/{}?api-version={}", self.base_url, path, version),
            None => format!("{}/{}", self.base_url, path),
        }
    }

    /// The authentication header name/value pair for this endpoint
    pub fn auth_header(&self) -> (&'static str, String) {
        match self.kind {
            ProviderKind::Azure => ("api-key", self.api_key.clone()),
            _ => ("Authorization", format!("Bearer {}", self.api_key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_requires_key() {
        assert!(matches!(
            ProviderEndpoint::openai(""),
            Err(TransportError::NotInitialized(_))
        ));
        assert!(ProviderEndpoint::openai("sk-test").is_ok());
    }

    #[test]
    fn test_ollama_appends_compatibility_path() {
        let endpoint = ProviderEndpoint::ollama("http://localhost:11434");
        assert_eq!(
            endpoint.url("chat/completions"),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn test_ollama_trailing_slash() {
        let endpoint = ProviderEndpoint::ollama("http://localhost:11434/");
        assert_eq!(
            endpoint.url("responses"),
            "http://localhost:11434/v1/responses"
        );
    }

    #[test]
    fn test_azure_url_carries_api_version() {
        let endpoint = ProviderEndpoint::azure(
            "https://example.openai.azure.com",
            "my-deployment",
            "key",
            "2023-05-15",
        )
        .unwrap();

        assert_eq!(
            endpoint.url("chat/completions"),
            "https://example.openai.azure.com/openai/deployments/my-deployment/chat/completions?api-version=2023-05-15"
        );
    }

    #[test]
    fn test_azure_uses_api_key_header() {
        let endpoint =
            ProviderEndpoint::azure("https://example.openai.azure.com", "dep", "key", "v").unwrap();
        assert_eq!(endpoint.auth_header(), ("api-key", "key".to_string()));
    }

    #[test]
    fn test_bearer_auth_for_openai() {
        let endpoint = ProviderEndpoint::openai("sk-test").unwrap();
        assert_eq!(
            endpoint.auth_header(),
            ("Authorization", "Bearer sk-test".to_string())
        );
    }

    #[test]
    fn test_custom_requires_base_url() {
        assert!(ProviderEndpoint::custom("", "key").is_err());
        let endpoint = ProviderEndpoint::custom("https://llm.internal/v1", "key").unwrap();
        assert_eq!(endpoint.kind(), ProviderKind::Custom);
    }
}
