//! Best-effort enrichment fetcher

use crate::error::EnrichError;
use crate::transform::apply_transform;
use crate::url_check::validate_api_url;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Configuration for the external enrichment API
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    /// Whether enrichment is enabled at all
    pub enabled: bool,

    /// External API URL
    pub url: String,

    /// HTTP method (GET, POST, or PUT)
    pub method: String,

    /// Request headers as a JSON object string
    pub headers: String,

    /// Request body as a JSON string (POST/PUT only)
    pub body: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Optional dot-notation transform applied to the response
    pub transform: Option<String>,

    /// Allow private addresses (for internal enrichment services)
    pub allow_private_ips: bool,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: String::new(),
            method: "GET".to_string(),
            headers: "{}".to_string(),
            body: "{}".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            transform: None,
            allow_private_ips: false,
        }
    }
}

/// Fetches data from the configured external API to enrich AI prompts.
///
/// Every failure mode (disabled integration, missing URL, failed SSRF
/// validation, network error, malformed configuration) resolves to
/// `None`. The pipeline treats `None` as "no enrichment data available"
/// and continues unaffected.
pub struct EnrichmentFetcher {
    config: EnrichmentConfig,
    client: reqwest::Client,
}

impl EnrichmentFetcher {
    /// Create a fetcher for the given configuration
    pub fn new(config: EnrichmentConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .unwrap();

        Self { config, client }
    }

    /// Fetch enrichment data, or `None` if disabled or anything fails
    pub async fn fetch(&self) -> Option<Value> {
        match self.try_fetch().await {
            Ok(data) => data,
            Err(err) => {
                error!(%err, "failed to fetch enrichment data");
                None
            }
        }
    }

    async fn try_fetch(&self) -> Result<Option<Value>, EnrichError> {
        if !self.config.enabled {
            debug!("external enrichment is disabled");
            return Ok(None);
        }
        if self.config.url.is_empty() {
            warn!("external enrichment enabled but no URL configured");
            return Ok(None);
        }

        let url = validate_api_url(&self.config.url, self.config.allow_private_ips)?;
        debug!(%url, "fetching enrichment data");

        let method = self.config.method.to_uppercase();
        let mut request = match method.as_str() {
            "GET" => self.client.get(url),
            "POST" => self.client.post(url),
            "PUT" => self.client.put(url),
            other => {
                return Err(EnrichError::Config(format!(
                    "unsupported HTTP method: {other}"
                )))
            }
        };

        for (name, value) in parse_headers(&self.config.headers) {
            request = request.header(name.as_str(), value.as_str());
        }

        if method == "POST" || method == "PUT" {
            let body: Value = serde_json::from_str(&self.config.body).unwrap_or_else(|err| {
                warn!(%err, "failed to parse enrichment request body, sending empty object");
                Value::Object(Default::default())
            });
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| EnrichError::Communication(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(EnrichError::Communication(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let mut data: Value = response
            .json()
            .await
            .map_err(|e| EnrichError::Communication(format!("Failed to parse response: {e}")))?;

        if let Some(transform) = self.config.transform.as_deref() {
            data = apply_transform(data, transform);
        }

        Ok(Some(data))
    }
}

/// Parse the configured header JSON into name/value pairs, dropping
/// anything that is not a string value
fn parse_headers(raw: &str) -> Vec<(String, String)> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map
            .into_iter()
            .filter_map(|(name, value)| match value {
                Value::String(text) => Some((name, text)),
                _ => None,
            })
            .collect(),
        Ok(_) | Err(_) => {
            warn!("failed to parse enrichment headers, sending none");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_yields_none() {
        let fetcher = EnrichmentFetcher::new(EnrichmentConfig::default());
        assert_eq!(fetcher.fetch().await, None);
    }

    #[tokio::test]
    async fn test_missing_url_yields_none() {
        let config = EnrichmentConfig {
            enabled: true,
            ..Default::default()
        };
        let fetcher = EnrichmentFetcher::new(config);
        assert_eq!(fetcher.fetch().await, None);
    }

    #[tokio::test]
    async fn test_blocked_url_yields_none() {
        let config = EnrichmentConfig {
            enabled: true,
            url: "http://169.254.169.254/latest/meta-data".to_string(),
            ..Default::default()
        };
        let fetcher = EnrichmentFetcher::new(config);
        assert_eq!(fetcher.fetch().await, None);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_yields_none() {
        let config = EnrichmentConfig {
            enabled: true,
            url: "http://127.0.0.1:1/data".to_string(),
            allow_private_ips: true,
            timeout_secs: 1,
            ..Default::default()
        };
        let fetcher = EnrichmentFetcher::new(config);
        assert_eq!(fetcher.fetch().await, None);
    }

    #[test]
    fn test_parse_headers() {
        let headers = parse_headers(r#"{"Authorization": "Bearer x", "X-Count": 3}"#);
        assert_eq!(
            headers,
            vec![("Authorization".to_string(), "Bearer x".to_string())]
        );

        assert!(parse_headers("not json").is_empty());
        assert!(parse_headers("[1, 2]").is_empty());
    }
}
